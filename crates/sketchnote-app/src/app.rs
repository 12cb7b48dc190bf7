//! Headless application shell: load a stored drawing, replay input, export.

use crate::script::{self, ScriptEvent};
use sketchnote_core::{Canvas, CanvasConfig, ConfigError, DocumentExport, KeyboardShortcuts};
use sketchnote_render::{RendererError, SkiaRenderer};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: invalid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Renderer error: {0}")]
    Render(#[from] RendererError),
    #[error("Could not serialize export: {0}")]
    Export(#[source] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

pub const USAGE: &str = "usage: sketchnote [--input <state.json>] [--script <events.json>] \
[--config <config.json>] [--font <font.ttf>] [--png <preview.png>] <output.json>";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Stored canvas state to start from.
    pub input: Option<PathBuf>,
    /// Input script to replay.
    pub script: Option<PathBuf>,
    /// Canvas configuration overrides.
    pub config: Option<PathBuf>,
    /// Font used to rasterize text labels.
    pub font: Option<PathBuf>,
    /// Where to write the raster preview as a PNG file.
    pub png: Option<PathBuf>,
    /// Where to write the exported document.
    pub output: PathBuf,
}

impl AppConfig {
    /// Parse command-line arguments (without the program name).
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, AppError> {
        let mut config = AppConfig::default();
        let mut output = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--input" => &mut config.input,
                "--script" => &mut config.script,
                "--config" => &mut config.config,
                "--font" => &mut config.font,
                "--png" => &mut config.png,
                flag if flag.starts_with("--") => {
                    return Err(AppError::Usage(format!("unknown option {}", flag)));
                }
                _ => {
                    if output.replace(PathBuf::from(&arg)).is_some() {
                        return Err(AppError::Usage(format!("unexpected argument {}", arg)));
                    }
                    continue;
                }
            };
            let value = args
                .next()
                .ok_or_else(|| AppError::Usage(format!("{} needs a value", arg)))?;
            *slot = Some(PathBuf::from(value));
        }

        config.output = output.ok_or_else(|| AppError::Usage("missing output path".to_string()))?;
        Ok(config)
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub steps: usize,
    pub export: DocumentExport,
}

/// The headless application.
pub struct App {
    canvas: Canvas,
    shortcuts: KeyboardShortcuts,
    renderer: SkiaRenderer,
}

impl App {
    /// Build the canvas and renderer from `config`.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let canvas_config = match &config.config {
            Some(path) => CanvasConfig::from_json(&read_to_string(path)?)?,
            None => CanvasConfig::default(),
        };

        let canvas = match &config.input {
            Some(path) => Canvas::from_initial_state(&read_json(path)?, canvas_config),
            None => Canvas::new(canvas_config),
        };
        log::info!("Canvas loaded with {} drawables", canvas.objects().len());

        let renderer = match &config.font {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|source| AppError::Io {
                    path: path.clone(),
                    source,
                })?;
                SkiaRenderer::new().with_font(bytes)?
            }
            None => SkiaRenderer::new(),
        };

        let mut shortcuts = KeyboardShortcuts::new();
        shortcuts.mount();

        Ok(Self {
            canvas,
            shortcuts,
            renderer,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Replay input steps against the canvas.
    pub fn replay(&mut self, events: &[ScriptEvent]) -> usize {
        script::replay(&mut self.canvas, &self.shortcuts, events)
    }

    /// Export the committed drawables with a raster preview.
    pub fn export(&mut self) -> DocumentExport {
        self.canvas.export(Some(&mut self.renderer))
    }

    /// Load, replay, export and write the results.
    pub fn run(config: &AppConfig) -> Result<RunSummary, AppError> {
        let mut app = App::new(config)?;

        let steps = match &config.script {
            Some(path) => {
                let events = script::parse_script(&read_to_string(path)?).map_err(|source| AppError::Json {
                    path: path.clone(),
                    source,
                })?;
                app.replay(&events)
            }
            None => 0,
        };

        let export = app.export();
        let json = export.to_json().map_err(AppError::Export)?;
        write(&config.output, json.as_bytes())?;
        log::info!(
            "Wrote {} drawables to {}",
            export.objects.len(),
            config.output.display()
        );

        if let Some(path) = &config.png {
            match export.raster_png() {
                Some(png) => write(path, &png)?,
                None => log::warn!("No raster preview to write to {}", path.display()),
            }
        }

        app.shortcuts.unmount();
        Ok(RunSummary { steps, export })
    }
}

fn read_to_string(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> Result<serde_json::Value, AppError> {
    serde_json::from_str(&read_to_string(path)?).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    std::fs::write(path, contents).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}
