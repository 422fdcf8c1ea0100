//! # Host Runtime
//!
//! Wires settings, storage, the editing session and the renderer together.

use crate::input_script::{InputScript, InputScriptError, ScriptedInput};
use services_editor_rich::{EditorError, RichEditor};
use services_settings::persistence::load_overrides_safe;
use services_settings::{create_default_registry, EditorConfig};
use services_storage::{FileStore, KeyValueDocumentStore};
use std::fs;
use std::io;
use std::path::PathBuf;
use text_renderer_host::{DocumentFrame, TextRenderer};
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Script error: {0}")]
    Script(#[from] InputScriptError),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Host runtime configuration
#[derive(Debug, Clone, Default)]
pub struct HostRuntimeConfig {
    /// Optional input script text
    pub script: Option<String>,
    /// Store file; defaults to the `storage.path` setting
    pub store_path: Option<PathBuf>,
    /// Settings overrides file
    pub config_path: Option<PathBuf>,
    /// Never emit ANSI escapes
    pub plain: bool,
    /// Run the user save action after the script
    pub save_on_exit: bool,
}

/// Host runtime
pub struct HostRuntime {
    config: HostRuntimeConfig,
    editor: RichEditor,
    renderer: TextRenderer,
    script: Option<InputScript>,
    /// Step counter
    steps: usize,
}

impl HostRuntime {
    /// Creates a new host runtime
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        let editor_config = Self::load_settings(config.config_path.as_ref())?;

        let store_path = config
            .store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&editor_config.storage_path));
        log::info!("document store at {}", store_path.display());
        let store = KeyValueDocumentStore::new(
            FileStore::open_or_empty(store_path),
            editor_config.storage_key.clone(),
        );

        let script = config
            .script
            .as_deref()
            .map(InputScript::from_text)
            .transpose()?;

        let renderer = TextRenderer::new().with_ansi(editor_config.ansi && !config.plain);
        // Autosave is flushed once per run, not on every keystroke
        let editor =
            RichEditor::open(Some(Box::new(store)), editor_config).with_deferred_autosave();

        Ok(Self {
            config,
            editor,
            renderer,
            script,
            steps: 0,
        })
    }

    /// Reads the settings registry plus the overrides file, if one is given
    fn load_settings(path: Option<&PathBuf>) -> Result<EditorConfig, HostRuntimeError> {
        let mut registry = create_default_registry();
        if let Some(path) = path {
            let bytes = fs::read(path).map_err(|source| HostRuntimeError::Read {
                path: path.clone(),
                source,
            })?;
            let overrides = load_overrides_safe(&bytes);
            for rejected in overrides.apply_to(&mut registry) {
                log::warn!("ignoring override in {}: {}", path.display(), rejected);
            }
        }
        Ok(EditorConfig::from_registry(&registry))
    }

    pub fn editor(&self) -> &RichEditor {
        &self.editor
    }

    /// Number of scripted inputs processed so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Processes one scripted input
    pub fn step(&mut self, input: &ScriptedInput) -> Result<(), HostRuntimeError> {
        self.steps += 1;
        match input {
            ScriptedInput::Key(event) => {
                let result = self.editor.process_key(event)?;
                log::trace!("step {}: {:?} -> {}", self.steps, event.code, result);
            }
            ScriptedInput::Save => {
                // The outcome is recorded as a notice either way
                if let Err(err) = self.editor.save() {
                    log::debug!("scripted save failed: {}", err);
                }
            }
        }
        Ok(())
    }

    /// Runs the whole script and returns the final rendering
    pub fn run(&mut self) -> Result<String, HostRuntimeError> {
        while let Some(input) = self.script.as_mut().and_then(InputScript::next_input) {
            self.step(&input)?;
        }

        if self.config.save_on_exit {
            if let Err(err) = self.editor.save() {
                log::warn!("save on exit failed: {}", err);
            }
        }
        if self.editor.flush_autosave() {
            log::debug!("autosaved version {}", self.editor.state().version());
        }

        for notice in self.editor.notices().iter() {
            log::info!("{}", notice);
        }
        Ok(self.render())
    }

    /// Current frame
    pub fn frame(&self) -> DocumentFrame {
        self.renderer.render(
            self.editor.document(),
            self.editor.selection(),
            self.editor.state().version(),
        )
    }

    /// Full snapshot of the current frame with the latest notice as status
    pub fn render(&mut self) -> String {
        let frame = self.frame();
        let status = self
            .editor
            .notices()
            .latest()
            .map(ToString::to_string)
            .unwrap_or_else(|| "Ready".to_string());
        self.renderer.render_snapshot(&frame, Some(&status))
    }
}
