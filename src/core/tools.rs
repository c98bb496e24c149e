use crate::core::ads::{escape_text, AdFormat, AdNetwork, AdScript, AdSlot};
use crate::core::plans::find_plan;
use crate::core::{ConversionCategory, Entitlement};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub category: ConversionCategory,
    pub label: &'static str,
    pub accepted_formats: &'static [&'static str],
    pub output_formats: &'static [&'static str],
}

pub static TOOLS: [ToolDefinition; 3] = [
    ToolDefinition {
        category: ConversionCategory::Documents,
        label: "Documents",
        accepted_formats: &[".pdf", ".doc", ".docx", ".txt", ".odt", ".rtf"],
        output_formats: &["PDF", "DOCX", "TXT", "ODT", "RTF"],
    },
    ToolDefinition {
        category: ConversionCategory::Images,
        label: "Images",
        accepted_formats: &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp"],
        output_formats: &["JPG", "PNG", "WEBP", "GIF", "SVG"],
    },
    ToolDefinition {
        category: ConversionCategory::Media,
        label: "Media",
        accepted_formats: &[".mp4", ".mp3", ".wav", ".avi", ".mov", ".mkv", ".flac"],
        output_formats: &["MP4", "MP3", "WAV", "AVI", "MOV"],
    },
];

pub fn tool_for(category: ConversionCategory) -> &'static ToolDefinition {
    match category {
        ConversionCategory::Documents => &TOOLS[0],
        ConversionCategory::Images => &TOOLS[1],
        ConversionCategory::Media => &TOOLS[2],
    }
}

impl ToolDefinition {
    pub fn offers_output(&self, format: &str) -> bool {
        self.output_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

const AD_PUSH_SCRIPT: &str = "<script>(adsbygoogle = window.adsbygoogle || []).push({});</script>";

/// Tools page fragment. Owns the page's ad script and slots so injection and
/// slot registration happen once per panel instance; ads only render for
/// callers whose entitlement shows them.
pub struct ToolsPanel {
    entitlement: Entitlement,
    network: AdNetwork,
    script: AdScript,
    top_slot: AdSlot,
    bottom_slot: AdSlot,
}

impl ToolsPanel {
    pub fn new(entitlement: Entitlement, network: AdNetwork) -> Self {
        Self {
            entitlement,
            script: AdScript::new(network.clone()),
            top_slot: AdSlot::new("file-uploader-top").with_format(AdFormat::Horizontal),
            bottom_slot: AdSlot::new("file-uploader-bottom")
                .with_format(AdFormat::Rectangle)
                .with_responsive(false),
            network,
        }
    }

    pub fn render(&mut self, category: ConversionCategory) -> String {
        let tool = tool_for(category);
        let e = self.entitlement;
        let mut html = String::new();

        if e.show_ads {
            if let Some(tag) = self.script.inject() {
                html.push_str(&tag);
            }
        }

        html.push_str(r#"<section class="tools">"#);
        html.push_str(&format!(
            concat!(
                r#"<div class="plan-details"><p>Current Plan: {}</p>"#,
                "<p>Daily Conversions: {}</p><p>Max File Size: {}</p><p>Ads: {}</p></div>"
            ),
            find_plan(e.plan).name,
            if e.is_premium { "Unlimited" } else { "5/day" },
            e.size_limit_label(),
            if e.show_ads { "Yes" } else { "None" }
        ));

        html.push_str(r#"<nav class="tabs">"#);
        for t in &TOOLS {
            let active = if t.category == category { " active" } else { "" };
            html.push_str(&format!(
                r#"<a class="tab{}" href="/tools?category={}">{}</a>"#,
                active,
                t.category.as_str(),
                t.label
            ));
        }
        html.push_str("</nav>");

        if e.show_ads {
            let top = Self::ad_slot(&mut self.top_slot, &self.script, &self.network);
            html.push_str(&top);
        }

        html.push_str(&format!(
            concat!(
                r#"<div class="uploader" data-category="{}">"#,
                "<p>Accepted formats: {}</p><p>Max size: {}</p>",
                "<ul>{}</ul></div>"
            ),
            category.as_str(),
            escape_text(&tool.accepted_formats.join(", ")),
            e.size_limit_label(),
            tool.output_formats
                .iter()
                .map(|f| format!("<li>{}</li>", f))
                .collect::<String>()
        ));

        if e.show_ads {
            let bottom = Self::ad_slot(&mut self.bottom_slot, &self.script, &self.network);
            html.push_str(&bottom);
        }

        html.push_str("</section>");
        html
    }

    /// Live units are pushed to the loaded script the first time they render.
    fn ad_slot(slot: &mut AdSlot, script: &AdScript, network: &AdNetwork) -> String {
        let mut html = slot.render(network);
        if network.production && script.is_injected() && slot.register() {
            html.push_str(AD_PUSH_SCRIPT);
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ads::DEFAULT_SCRIPT_URL;
    use crate::core::PlanType;

    fn network() -> AdNetwork {
        AdNetwork {
            publisher_id: "ca-pub-0".to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            production: false,
        }
    }

    #[test]
    fn test_free_panel_has_ads_once() {
        let mut panel = ToolsPanel::new(Entitlement::for_plan(PlanType::Free), network());
        let first = panel.render(ConversionCategory::Images);
        assert!(first.contains("adsbygoogle-init"));
        assert!(first.contains("Slot: file-uploader-top"));
        assert!(first.contains("Slot: file-uploader-bottom"));
        assert!(first.contains("<li>WEBP</li>"));

        // 同一頁面再次切換分頁不應重複注入
        let second = panel.render(ConversionCategory::Media);
        assert!(!second.contains("adsbygoogle-init"));
        assert!(second.contains("Slot: file-uploader-top"));
    }

    #[test]
    fn test_live_slots_pushed_once() {
        let live = AdNetwork {
            production: true,
            ..network()
        };
        let mut panel = ToolsPanel::new(Entitlement::for_plan(PlanType::Free), live);

        let first = panel.render(ConversionCategory::Documents);
        assert_eq!(first.matches(AD_PUSH_SCRIPT).count(), 2);
        assert!(first.contains(r#"data-ad-slot="file-uploader-top" data-ad-format="horizontal""#));
        assert!(first.contains(r#"data-ad-format="rectangle" data-full-width-responsive="false""#));

        let second = panel.render(ConversionCategory::Images);
        assert!(second.contains(r#"data-ad-slot="file-uploader-bottom""#));
        assert!(!second.contains(AD_PUSH_SCRIPT));
    }

    #[test]
    fn test_premium_panel_has_no_ads() {
        let mut panel = ToolsPanel::new(Entitlement::for_plan(PlanType::Premium), network());
        let html = panel.render(ConversionCategory::Documents);
        assert!(!html.contains("adsbygoogle"));
        assert!(!html.contains("Advertisement"));
        assert!(html.contains("Max File Size: 100MB"));
        assert!(html.contains("Current Plan: Premium"));
    }

    #[test]
    fn test_offers_output_ignores_case() {
        assert!(tool_for(ConversionCategory::Documents).offers_output("pdf"));
        assert!(!tool_for(ConversionCategory::Documents).offers_output("mp3"));
    }
}
