//! Viseme alphabets for lip-sync animation.
//!
//! A viseme is a visual mouth shape that corresponds to one or more phonemes.
//! Two alphabets are supported: the fine-grained 14-code Oculus set used by
//! rigs with per-viseme morph targets, and the coarse 5-vowel set exposed by
//! VRM-style expression rigs.

use serde::{Deserialize, Serialize};

/// Fine-grained (Oculus-style) viseme codes.
///
/// Silence is not part of the alphabet: a closed, idle mouth is simply the
/// absence of any active code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VisemeCode {
    /// /p/, /b/, /m/ (lips pressed together)
    #[serde(rename = "PP")]
    PP,
    /// /f/, /v/ (teeth on lip)
    #[serde(rename = "FF")]
    FF,
    /// /θ/, /ð/ (tongue between teeth)
    #[serde(rename = "TH")]
    TH,
    /// /t/, /d/ (tongue at roof)
    #[serde(rename = "DD")]
    DD,
    /// /k/, /g/ (back of tongue up)
    #[serde(rename = "kk")]
    Kk,
    /// /tʃ/, /dʒ/, /ʃ/ (tongue curved)
    #[serde(rename = "CH")]
    CH,
    /// /s/, /z/ (teeth together)
    #[serde(rename = "SS")]
    SS,
    /// /n/, /l/
    #[serde(rename = "nn")]
    Nn,
    /// /r/ (tongue curled)
    #[serde(rename = "RR")]
    RR,
    /// /a/ (mouth open wide)
    #[serde(rename = "aa")]
    Aa,
    /// /e/ (mouth medium)
    #[serde(rename = "E")]
    E,
    /// /i/ (mouth wide, teeth apart)
    #[serde(rename = "I")]
    I,
    /// /o/ (rounded, medium)
    #[serde(rename = "O")]
    O,
    /// /u/ (rounded, small)
    #[serde(rename = "U")]
    U,
}

impl VisemeCode {
    /// Every fine-grained code, in declaration order.
    pub const ALL: [VisemeCode; 14] = [
        VisemeCode::PP,
        VisemeCode::FF,
        VisemeCode::TH,
        VisemeCode::DD,
        VisemeCode::Kk,
        VisemeCode::CH,
        VisemeCode::SS,
        VisemeCode::Nn,
        VisemeCode::RR,
        VisemeCode::Aa,
        VisemeCode::E,
        VisemeCode::I,
        VisemeCode::O,
        VisemeCode::U,
    ];

    /// Canonical code string (`"PP"`, `"kk"`, `"aa"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            VisemeCode::PP => "PP",
            VisemeCode::FF => "FF",
            VisemeCode::TH => "TH",
            VisemeCode::DD => "DD",
            VisemeCode::Kk => "kk",
            VisemeCode::CH => "CH",
            VisemeCode::SS => "SS",
            VisemeCode::Nn => "nn",
            VisemeCode::RR => "RR",
            VisemeCode::Aa => "aa",
            VisemeCode::E => "E",
            VisemeCode::I => "I",
            VisemeCode::O => "O",
            VisemeCode::U => "U",
        }
    }

    /// Parse a canonical code string. Unrecognized codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == code)
    }

    /// Relative duration of this viseme (1.0 = an average viseme).
    ///
    /// Tuned lookup values, not derived from any acoustic model.
    pub fn base_duration(self) -> f64 {
        match self {
            VisemeCode::Aa => 0.95,
            VisemeCode::E => 0.90,
            VisemeCode::I => 0.92,
            VisemeCode::O => 0.96,
            VisemeCode::U => 0.95,
            VisemeCode::PP => 1.08,
            VisemeCode::SS => 1.23,
            VisemeCode::TH => 1.0,
            VisemeCode::DD => 1.05,
            VisemeCode::FF => 1.0,
            VisemeCode::Kk => 1.21,
            VisemeCode::Nn => 0.88,
            VisemeCode::RR => 0.88,
            VisemeCode::CH => 1.0,
        }
    }

    /// The coarse shape this code collapses to on a 5-expression rig.
    pub fn coarse(self) -> CoarseViseme {
        match self {
            VisemeCode::Aa | VisemeCode::Kk => CoarseViseme::Aa,
            VisemeCode::E | VisemeCode::CH => CoarseViseme::Ee,
            VisemeCode::I
            | VisemeCode::TH
            | VisemeCode::DD
            | VisemeCode::SS
            | VisemeCode::Nn => CoarseViseme::Ih,
            VisemeCode::O | VisemeCode::RR => CoarseViseme::Oh,
            VisemeCode::U | VisemeCode::PP | VisemeCode::FF => CoarseViseme::Ou,
        }
    }
}

impl std::fmt::Display for VisemeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VisemeCode {
    type Err = crate::error::LipsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::error::LipsyncError::InvalidInput(format!("unrecognized viseme code: {s}"))
        })
    }
}

/// Coarse 5-shape vowel alphabet (VRM `aa`/`ee`/`ih`/`oh`/`ou`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoarseViseme {
    Aa,
    Ee,
    Ih,
    Oh,
    Ou,
}

impl CoarseViseme {
    /// Every coarse code, in declaration order.
    pub const ALL: [CoarseViseme; 5] = [
        CoarseViseme::Aa,
        CoarseViseme::Ee,
        CoarseViseme::Ih,
        CoarseViseme::Oh,
        CoarseViseme::Ou,
    ];

    /// Expression name on a coarse rig.
    pub fn as_str(self) -> &'static str {
        match self {
            CoarseViseme::Aa => "aa",
            CoarseViseme::Ee => "ee",
            CoarseViseme::Ih => "ih",
            CoarseViseme::Oh => "oh",
            CoarseViseme::Ou => "ou",
        }
    }
}

impl std::fmt::Display for CoarseViseme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn codes_round_trip_through_strings() {
        for code in VisemeCode::ALL {
            assert_eq!(VisemeCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn unrecognized_code_is_rejected() {
        assert_eq!(VisemeCode::parse("sil"), None);
        assert_eq!(VisemeCode::parse("KK"), None);
        assert!("EE".parse::<VisemeCode>().is_err());
    }

    #[test]
    fn base_durations_are_positive() {
        for code in VisemeCode::ALL {
            assert!(code.base_duration() > 0.0, "{code} has no duration");
        }
    }

    #[test]
    fn bilabial_and_labiodental_share_a_coarse_shape() {
        assert_eq!(VisemeCode::PP.coarse(), VisemeCode::FF.coarse());
    }

    #[test]
    fn every_coarse_shape_is_reachable() {
        for coarse in CoarseViseme::ALL {
            assert!(
                VisemeCode::ALL.iter().any(|c| c.coarse() == coarse),
                "{coarse} has no fine code"
            );
        }
    }

    #[test]
    fn serde_uses_canonical_strings() {
        let json = serde_json::to_string(&VisemeCode::Kk).unwrap();
        assert_eq!(json, "\"kk\"");
        let code: VisemeCode = serde_json::from_str("\"aa\"").unwrap();
        assert_eq!(code, VisemeCode::Aa);
        assert!(serde_json::from_str::<VisemeCode>("\"sil\"").is_err());
    }
}
