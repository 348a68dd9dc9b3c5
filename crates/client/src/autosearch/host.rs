//! In-process host surfaces: a badge board and a surface URL registry.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use super::badge::BadgeColor;
use super::{BadgeSink, SurfaceResolver};

/// Badge currently shown on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeState {
    pub text: String,
    pub color: BadgeColor,
}

impl Default for BadgeState {
    fn default() -> Self {
        Self { text: String::new(), color: BadgeColor::Success }
    }
}

/// Badge state per surface.
#[derive(Debug, Default)]
pub struct BadgeBoard {
    badges: RwLock<HashMap<String, BadgeState>>,
}

impl BadgeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, surface: &str) -> Option<BadgeState> {
        self.badges.read().await.get(surface).cloned()
    }
}

#[async_trait]
impl BadgeSink for BadgeBoard {
    async fn set_text(&self, surface: &str, text: &str) {
        let mut badges = self.badges.write().await;
        badges.entry(surface.to_string()).or_default().text = text.to_string();
    }

    async fn set_color(&self, surface: &str, color: BadgeColor) {
        let mut badges = self.badges.write().await;
        badges.entry(surface.to_string()).or_default().color = color;
    }
}

/// Last known URL per surface.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    urls: RwLock<HashMap<String, String>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, surface: &str, url: &str) {
        self.urls.write().await.insert(surface.to_string(), url.to_string());
    }
}

#[async_trait]
impl SurfaceResolver for SurfaceRegistry {
    async fn current_url(&self, surface: &str) -> Option<String> {
        self.urls.read().await.get(surface).cloned()
    }
}
