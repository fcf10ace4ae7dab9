use serde::{Deserialize, Serialize};

/// Creation options for a floating window. An empty title gets the stock
/// "Window" (or "Settings" for config windows); `x`/`y` of `None` means
/// "use default centered placement", resolved against the terminal area on
/// first layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    pub width: u16,
    pub height: u16,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub resizable: bool,
    pub disable_title_stacking: bool,
    pub enable_ghost_button: bool,
    pub enable_close_button: bool,
    pub unique: bool,
    pub tag: String,
    pub id: String,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 48,
            height: 14,
            x: None,
            y: None,
            resizable: false,
            disable_title_stacking: false,
            enable_ghost_button: true,
            enable_close_button: true,
            unique: false,
            tag: String::new(),
            id: String::new(),
        }
    }
}

impl WindowOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
