//! Fixed choices offered on the design step, and the preview table keyed by
//! design style and tone.

use serde::Serialize;

pub const STEP_TITLES: [&str; 4] = ["テーマ設定", "対象・目的", "デザイン", "完成"];

pub const DESIGN_STYLES: [&str; 4] = ["シンプル", "モダン", "ビジネス", "クリエイティブ"];

pub const TONES: [&str; 4] = ["フォーマル", "カジュアル", "エネルギッシュ", "エレガント"];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FontOption {
    pub label: &'static str,
    pub value: &'static str,
    pub css_family: &'static str,
}

pub const FONT_OPTIONS: [FontOption; 4] = [
    FontOption {
        label: "メイリオ",
        value: "メイリオ",
        css_family: "Meiryo, メイリオ, sans-serif",
    },
    FontOption {
        label: "Meiryo UI",
        value: "Meiryo UI",
        css_family: "Meiryo UI, sans-serif",
    },
    FontOption {
        label: "遊ゴシック",
        value: "遊ゴシック",
        css_family: "'Yu Gothic', '游ゴシック', YuGothic, sans-serif",
    },
    FontOption {
        label: "Yu Gothic UI",
        value: "Yu Gothic UI",
        css_family: "Yu Gothic UI, sans-serif",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColorOption {
    pub value: &'static str,
    pub name: &'static str,
}

const fn color(value: &'static str, name: &'static str) -> ColorOption {
    ColorOption { value, name }
}

pub const COLOR_OPTIONS: [ColorOption; 14] = [
    color("#2563eb", "ブルー"),
    color("#93c5fd", "ライトブルー"),
    color("#16a34a", "グリーン"),
    color("#86efac", "ライトグリーン"),
    color("#dc2626", "レッド"),
    color("#fca5a5", "ライトレッド"),
    color("#9333ea", "パープル"),
    color("#c4b5fd", "ライトパープル"),
    color("#ea580c", "オレンジ"),
    color("#fdba74", "ライトオレンジ"),
    color("#374151", "グレー"),
    color("#d1d5db", "ライトグレー"),
    color("#000000", "ブラック"),
    color("#ffffff", "ホワイト"),
];

/// Preview image for a style/tone pair. Unknown or unset combinations have
/// no preview.
pub fn preview_image(design_style: &str, tone: &str) -> Option<&'static str> {
    let image = match (design_style, tone) {
        ("シンプル", "フォーマル") => "/static/simple-formal.png",
        ("シンプル", "カジュアル") => "/static/simple-casual.png",
        ("シンプル", "エネルギッシュ") => "/static/simple-energetic.png",
        ("シンプル", "エレガント") => "/static/simple-elegant.png",
        ("モダン", "フォーマル") => "/static/modern-formal.png",
        ("モダン", "カジュアル") => "/static/modern-casual.png",
        ("モダン", "エネルギッシュ") => "/static/modern-energetic.png",
        ("モダン", "エレガント") => "/static/modern-elegant.png",
        ("ビジネス", "フォーマル") => "/static/business-formal.png",
        ("ビジネス", "カジュアル") => "/static/business-casual.png",
        ("ビジネス", "エネルギッシュ") => "/static/business-energetic.png",
        ("ビジネス", "エレガント") => "/static/business-elegant.png",
        ("クリエイティブ", "フォーマル") => "/static/creative-formal.png",
        ("クリエイティブ", "カジュアル") => "/static/creative-casual.png",
        ("クリエイティブ", "エネルギッシュ") => "/static/creative-energetic.png",
        ("クリエイティブ", "エレガント") => "/static/creative-elegant.png",
        _ => return None,
    };
    Some(image)
}
