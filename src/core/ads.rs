//! Ad-network script injection and ad slots.
//!
//! Both pieces keep their own "already done" flag so a page instance never
//! injects the script or registers a slot twice. Whether ads appear at all is
//! decided by the caller (see [`crate::core::tools::ToolsPanel`]).

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCRIPT_URL: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    #[default]
    Auto,
    Rectangle,
    Vertical,
    Horizontal,
}

impl AdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdFormat::Auto => "auto",
            AdFormat::Rectangle => "rectangle",
            AdFormat::Vertical => "vertical",
            AdFormat::Horizontal => "horizontal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdNetwork {
    pub publisher_id: String,
    pub script_url: String,
    pub production: bool,
}

impl AdNetwork {
    pub fn script_src(&self) -> String {
        format!("{}?client={}", self.script_url, self.publisher_id)
    }
}

/// Per-page loader for the ad-network script.
#[derive(Debug)]
pub struct AdScript {
    network: AdNetwork,
    injected: bool,
}

impl AdScript {
    pub fn new(network: AdNetwork) -> Self {
        Self {
            network,
            injected: false,
        }
    }

    /// Script tag on the first call, `None` afterwards.
    pub fn inject(&mut self) -> Option<String> {
        if self.injected {
            return None;
        }
        self.injected = true;
        tracing::debug!("Injecting ad script for {}", self.network.publisher_id);

        Some(format!(
            r#"<script id="adsbygoogle-init" async crossorigin="anonymous" src="{}"></script>"#,
            escape_attr(&self.network.script_src())
        ))
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }
}

#[derive(Debug)]
pub struct AdSlot {
    pub slot: String,
    pub format: AdFormat,
    pub responsive: bool,
    pushed: bool,
}

impl AdSlot {
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            format: AdFormat::Auto,
            responsive: true,
            pushed: false,
        }
    }

    pub fn with_format(mut self, format: AdFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    /// Registers the slot with the loaded script. Returns `true` only the first time.
    pub fn register(&mut self) -> bool {
        if self.pushed {
            return false;
        }
        self.pushed = true;
        true
    }

    pub fn render(&self, network: &AdNetwork) -> String {
        if !network.production {
            return format!(
                concat!(
                    r#"<div class="ad-placeholder">"#,
                    r#"<p>Advertisement Placeholder</p><p>Slot: {}</p>"#,
                    "</div>"
                ),
                escape_text(&self.slot)
            );
        }

        format!(
            concat!(
                r#"<div class="ad-container">"#,
                r#"<ins class="adsbygoogle" style="display:block" data-ad-client="{}" "#,
                r#"data-ad-slot="{}" data-ad-format="{}" data-full-width-responsive="{}"></ins>"#,
                "</div>"
            ),
            escape_attr(&network.publisher_id),
            escape_attr(&self.slot),
            self.format.as_str(),
            self.responsive
        )
    }
}

pub(crate) fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(production: bool) -> AdNetwork {
        AdNetwork {
            publisher_id: "ca-pub-1234".to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            production,
        }
    }

    #[test]
    fn test_script_injected_once() {
        let mut script = AdScript::new(network(true));
        let tag = script.inject().unwrap();
        assert!(tag.contains("adsbygoogle.js?client=ca-pub-1234"));
        assert!(tag.contains("async"));
        assert!(script.is_injected());
        assert!(script.inject().is_none());
        assert!(script.inject().is_none());
    }

    #[test]
    fn test_slot_placeholder_outside_production() {
        let slot = AdSlot::new("file-uploader-top");
        let html = slot.render(&network(false));
        assert!(html.contains("Advertisement Placeholder"));
        assert!(html.contains("Slot: file-uploader-top"));
        assert!(!html.contains("adsbygoogle"));
    }

    #[test]
    fn test_slot_live_unit_in_production() {
        let slot = AdSlot::new("sidebar")
            .with_format(AdFormat::Vertical)
            .with_responsive(false);
        let html = slot.render(&network(true));
        assert!(html.contains(r#"data-ad-client="ca-pub-1234""#));
        assert!(html.contains(r#"data-ad-slot="sidebar""#));
        assert!(html.contains(r#"data-ad-format="vertical""#));
        assert!(html.contains(r#"data-full-width-responsive="false""#));
    }

    #[test]
    fn test_slot_registers_once() {
        let mut slot = AdSlot::new("x");
        assert!(slot.register());
        assert!(!slot.register());
    }

    #[test]
    fn test_slot_name_is_escaped() {
        let html = AdSlot::new("<b>").render(&network(false));
        assert!(html.contains("&lt;b&gt;"));
    }
}
