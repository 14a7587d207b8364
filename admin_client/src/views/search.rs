use std::time::Duration;

use tokio::time::Instant;

use crate::config::SEARCH_DEBOUNCE;

/// Debounced search box plus current page for the list views.
///
/// Typed text only becomes the effective filter once it has been stable for
/// the debounce window, and every time it does the page goes back to 1.
#[derive(Debug, Clone)]
pub struct SearchPager {
    input: String,
    name: String,
    page: u32,
    edited_at: Option<Instant>,
    delay: Duration,
}

impl Default for SearchPager {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPager {
    pub fn new() -> Self {
        Self::with_delay(SEARCH_DEBOUNCE)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            input: String::new(),
            name: String::new(),
            page: 1,
            edited_at: None,
            delay,
        }
    }

    pub fn type_text(&mut self, text: &str) {
        self.input = text.to_string();
        self.edited_at = Some(Instant::now());
    }

    pub fn clear_search(&mut self) {
        self.type_text("");
    }

    /// Applies the pending text if the window has passed. True when it did.
    pub fn poll(&mut self) -> bool {
        match self.edited_at {
            Some(at) if at.elapsed() >= self.delay => {
                self.edited_at = None;
                self.name = self.input.clone();
                self.page = 1;
                true
            }
            _ => false,
        }
    }

    /// Waits out the window for the last keystroke, then applies it.
    pub async fn settle(&mut self) -> bool {
        if let Some(at) = self.edited_at {
            tokio::time::sleep_until(at + self.delay).await;
        }
        self.poll()
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// The effective filter, as sent to the server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What is in the text box right now.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_debouncing(&self) -> bool {
        self.edited_at.is_some()
    }
}
