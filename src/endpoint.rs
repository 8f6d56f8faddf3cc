//! Service endpoints and the payload each one returns.

use std::fmt;

/// Production base URL of the AI open platform.
pub const DEFAULT_BASE_URL: &str = "https://api.ai.qq.com/fcgi-bin";

/// One of the supported capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    FaceMerge,
    FaceCosmetic,
    FaceDecoration,
    ImgFilter,
    FaceSticker,
    FaceAge,
    TextTrans,
}

impl Endpoint {
    pub const ALL: [Endpoint; 7] = [
        Endpoint::FaceMerge,
        Endpoint::FaceCosmetic,
        Endpoint::FaceDecoration,
        Endpoint::ImgFilter,
        Endpoint::FaceSticker,
        Endpoint::FaceAge,
        Endpoint::TextTrans,
    ];

    /// Path appended to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::FaceMerge => "/ptu/ptu_facemerge",
            Endpoint::FaceCosmetic => "/ptu/ptu_facecosmetic",
            Endpoint::FaceDecoration => "/ptu/ptu_facedecoration",
            Endpoint::ImgFilter => "/ptu/ptu_imgfilter",
            Endpoint::FaceSticker => "/ptu/ptu_facesticker",
            Endpoint::FaceAge => "/ptu/ptu_faceage",
            Endpoint::TextTrans => "/nlp/nlp_texttrans",
        }
    }

    /// Field under `data` that holds the result.
    pub fn payload_field(&self) -> &'static str {
        match self {
            Endpoint::TextTrans => "trans_text",
            _ => "image",
        }
    }

    /// Request parameter naming the effect template, for the endpoints that take one.
    pub fn template_param(&self) -> Option<&'static str> {
        match self {
            Endpoint::FaceMerge => Some("model"),
            Endpoint::FaceCosmetic => Some("cosmetic"),
            Endpoint::FaceDecoration => Some("decoration"),
            Endpoint::ImgFilter => Some("filter"),
            Endpoint::FaceSticker => Some("sticker"),
            Endpoint::FaceAge | Endpoint::TextTrans => None,
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    /// Short name used by the CLI and in log records.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::FaceMerge => "face-merge",
            Endpoint::FaceCosmetic => "face-cosmetic",
            Endpoint::FaceDecoration => "face-decoration",
            Endpoint::ImgFilter => "img-filter",
            Endpoint::FaceSticker => "face-sticker",
            Endpoint::FaceAge => "face-age",
            Endpoint::TextTrans => "text-trans",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Translation direction for [`Endpoint::TextTrans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationType {
    /// Detect the source language and translate between Chinese and English.
    #[default]
    AutoDetect,
    ZhToEn,
    EnToZh,
    ZhToEs,
    EsToZh,
    ZhToFr,
    FrToZh,
    EnToVi,
    ViToEn,
    ZhToYue,
    YueToZh,
    /// Any other catalog value.
    Code(u32),
}

impl TranslationType {
    pub fn code(&self) -> u32 {
        match self {
            TranslationType::AutoDetect => 0,
            TranslationType::ZhToEn => 1,
            TranslationType::EnToZh => 2,
            TranslationType::ZhToEs => 3,
            TranslationType::EsToZh => 4,
            TranslationType::ZhToFr => 5,
            TranslationType::FrToZh => 6,
            TranslationType::EnToVi => 7,
            TranslationType::ViToEn => 8,
            TranslationType::ZhToYue => 9,
            TranslationType::YueToZh => 10,
            TranslationType::Code(c) => *c,
        }
    }
}

impl From<u32> for TranslationType {
    fn from(code: u32) -> Self {
        match code {
            0 => TranslationType::AutoDetect,
            1 => TranslationType::ZhToEn,
            2 => TranslationType::EnToZh,
            3 => TranslationType::ZhToEs,
            4 => TranslationType::EsToZh,
            5 => TranslationType::ZhToFr,
            6 => TranslationType::FrToZh,
            7 => TranslationType::EnToVi,
            8 => TranslationType::ViToEn,
            9 => TranslationType::ZhToYue,
            10 => TranslationType::YueToZh,
            other => TranslationType::Code(other),
        }
    }
}
