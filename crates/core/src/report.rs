use serde::{Deserialize, Serialize};

/// Everything captured about a failed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    /// File stem shared by every file of the report
    pub name: String,
    pub message: String,
    pub url: Option<String>,
    pub html: Option<String>,
    #[serde(skip)]
    pub screenshot: Option<Vec<u8>>,
}

impl FailureReport {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            url: None,
            html: None,
            screenshot: None,
        }
    }

    /// Text dump written to the `.txt` file.
    pub fn text(&self) -> String {
        match &self.url {
            Some(url) => format!("URL: {}\n\n{}\n", url, self.message),
            None => format!("{}\n", self.message),
        }
    }
}
