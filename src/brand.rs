//! Static brand reference data. Read-only for the life of the process, so it can be
//! shared across any number of concurrent campaign requests without locking.

use serde::Serialize;

pub const BRAND_GUIDELINES_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct BrandColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualStyle {
    pub style: &'static str,
    pub imagery: &'static str,
    pub colors: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageStyle {
    pub primary_tone: &'static str,
    pub cta_style: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentGuidelines {
    pub tone: &'static str,
    pub style: &'static str,
    pub visual: VisualStyle,
    pub messages: MessageStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Typography {
    pub primary_font: &'static str,
    pub secondary_font: &'static str,
    pub sizes: &'static [(&'static str, &'static str)],
    pub weights: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelGroup {
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
    pub style: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegalText {
    pub disclaimer: &'static str,
    pub copyright: &'static str,
    pub banking: &'static str,
    pub investment: &'static str,
    pub insurance: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclaimerKind {
    Banking,
    Investment,
    Insurance,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandGuidelines {
    pub colors: BrandColors,
    pub premium: SegmentGuidelines,
    pub standard: SegmentGuidelines,
    pub basic: SegmentGuidelines,
    pub typography: Typography,
    pub digital_channels: ChannelGroup,
    pub physical_channels: ChannelGroup,
    pub legal: LegalText,
}

pub static BRAND_GUIDELINES: BrandGuidelines = BrandGuidelines {
    colors: BrandColors {
        primary: "#FDB813",
        secondary: "#000000",
        accent: "#BE9B59",
        text: "#1E1E1E",
        background: "#FFFFFF",
    },
    premium: SegmentGuidelines {
        tone: "Sophisticated, exclusive, and personalized",
        style: "Professional and premium",
        visual: VisualStyle {
            style: "Minimalist and elegant",
            imagery: "Sophisticated, luxury-focused imagery",
            colors: &["#FDB813", "#BE9B59", "#000000"],
        },
        messages: MessageStyle {
            primary_tone: "Exclusive and personalized",
            cta_style: "Sophisticated and direct",
        },
    },
    standard: SegmentGuidelines {
        tone: "Professional, friendly, and informative",
        style: "Clear and professional",
        visual: VisualStyle {
            style: "Clean and modern",
            imagery: "Professional, lifestyle imagery",
            colors: &["#FDB813", "#000000", "#FFFFFF"],
        },
        messages: MessageStyle {
            primary_tone: "Professional and helpful",
            cta_style: "Clear and actionable",
        },
    },
    basic: SegmentGuidelines {
        tone: "Clear, simple, and direct",
        style: "Straightforward and helpful",
        visual: VisualStyle {
            style: "Simple and clean",
            imagery: "Clear, relatable imagery",
            colors: &["#FDB813", "#000000", "#FFFFFF"],
        },
        messages: MessageStyle {
            primary_tone: "Simple and direct",
            cta_style: "Easy to understand",
        },
    },
    typography: Typography {
        primary_font: "CommBank Sans, Arial, sans-serif",
        secondary_font: "CommBank Headline, Arial, sans-serif",
        sizes: &[
            ("small", "0.875rem"),
            ("base", "1rem"),
            ("large", "1.25rem"),
            ("xlarge", "1.5rem"),
        ],
        weights: &[("regular", "400"), ("medium", "500"), ("bold", "700")],
    },
    digital_channels: ChannelGroup {
        primary: &["CommBank App", "NetBank"],
        secondary: &["Email", "SMS"],
        style: "Digital-first approach",
    },
    physical_channels: ChannelGroup {
        primary: &["Branch", "Direct Mail"],
        secondary: &["Phone", "ATM"],
        style: "Personal touch approach",
    },
    legal: LegalText {
        disclaimer: "Terms and conditions apply. Consider the relevant Product Disclosure Statement available at commbank.com.au before making any decisions.",
        copyright: "© Commonwealth Bank of Australia 2024 ABN 48 123 123 124 AFSL and Australian credit licence 234945",
        banking: "Banking products and services by Commonwealth Bank of Australia.",
        investment: "Investment products are subject to investment risk.",
        insurance: "Insurance products are subject to eligibility criteria.",
    },
};

impl BrandGuidelines {
    /// Guidelines for a segment name. Unrecognized names fall back to Standard.
    pub fn segment(&self, name: &str) -> &SegmentGuidelines {
        match name {
            "Premium" => &self.premium,
            "Basic" => &self.basic,
            _ => &self.standard,
        }
    }

    pub fn brand_colors(&self, segment: &str) -> &'static [&'static str] {
        self.segment(segment).visual.colors
    }

    /// High engagement gets digital channels, Low gets physical ones, anything else a mix.
    pub fn channel_recommendations(&self, engagement: &str) -> Vec<&'static str> {
        match engagement {
            "High" => self.digital_channels.primary.to_vec(),
            "Low" => self.physical_channels.primary.to_vec(),
            _ => self
                .digital_channels
                .primary
                .iter()
                .chain(self.physical_channels.secondary.iter())
                .copied()
                .collect(),
        }
    }

    pub fn legal_disclaimer(&self, kind: DisclaimerKind) -> String {
        let regulatory = match kind {
            DisclaimerKind::Banking => self.legal.banking,
            DisclaimerKind::Investment => self.legal.investment,
            DisclaimerKind::Insurance => self.legal.insurance,
        };
        format!("{} {}", regulatory, self.legal.disclaimer)
    }
}
