use bevy::prelude::*;

/// One-line feedback shown in the status bar.
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: Option<String>,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!("{}", text);
        self.text = Some(text);
    }
}

/// Resource tracking failures that need the user's attention.
#[derive(Resource, Default)]
pub struct EditorErrorDialog {
    pub title: String,
    pub message: Option<String>,
}

impl EditorErrorDialog {
    pub fn show(&mut self, title: &str, message: impl Into<String>) {
        self.title = title.to_string();
        self.message = Some(message.into());
    }

    pub fn is_open(&self) -> bool {
        self.message.is_some()
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }
}
