//! English letter-to-sound rules.
//!
//! Adapted from NRL Report 7948, "Automatic Translation of English Text to
//! Phonetics by Means of Letter-to-Sound Rules" (1976), with phonemes folded
//! straight into Oculus visemes.

use super::converter::{WordVisemeResult, word_to_visemes};
use super::normalize::normalize;
use super::rules::RuleSet;
use super::LipsyncProcessor;
use crate::error::Result;

const RULES_A: &[&str] = &[
    "[A] =aa", " [ARE] =aa RR", " [AR]O=aa RR", "[AR]#=E RR",
    " ^[AS]#=E SS", "[A]WA=aa", "[AW]=aa", " :[ANY]=E nn I",
    "[A]^+#=E", "#:[ALLY]=aa nn I", " [AL]#=aa nn", "[AGAIN]=aa kk E nn",
    "#:[AG]E=I CH", "[A]^+:#=aa", ":[A]^+ =E", "[A]^%=E",
    " [ARR]=aa RR", "[ARR]=aa RR", " :[AR] =aa RR", "[AR] =E",
    "[AR]=aa RR", "[AIR]=E RR", "[AI]=E", "[AY]=E", "[AU]=aa",
    "#:[AL] =aa nn", "#:[ALS] =aa nn SS", "[ALK]=aa kk", "[AL]^=aa nn",
    " :[ABLE]=E PP aa nn", "[ABLE]=aa PP aa nn", "[ANG]+=E nn CH", "[A]=aa",
];

const RULES_B: &[&str] = &[
    " [BE]^#=PP I", "[BEING]=PP I I nn", " [BOTH] =PP O TH",
    " [BUS]#=PP I SS", "[BUIL]=PP I nn", "[B]=PP",
];

const RULES_C: &[&str] = &[
    " [CH]^=kk", "^E[CH]=kk", "[CH]=CH", " S[CI]#=SS aa",
    "[CI]A=CH", "[CI]O=CH", "[CI]EN=CH", "[C]+=SS",
    "[CK]=kk", "[COM]%=kk aa PP", "[C]=kk",
];

const RULES_D: &[&str] = &[
    "#:[DED] =DD I DD", ".E[D] =DD", "#^:E[D] =DD", " [DE]^#=DD I",
    " [DO] =DD U", " [DOES]=DD aa SS", " [DOING]=DD U I nn",
    " [DOW]=DD aa", "[DU]A=CH U", "[D]=DD",
];

const RULES_E: &[&str] = &[
    "#:[E] =", " :[E] =I", "#[ED] =DD", "#:[E]D =",
    "[EV]ER=E FF", "[E]^%=I", "[ERI]#=I RR I", "[ERI]=E RR I",
    "#:[ER]#=E", "[ER]#=E RR", "[ER]=E", " [EVEN]=I FF E nn",
    "#:[E]W=", "@[EW]=U", "[EW]=I U", "[E]O=I", "#:&[ES] =I SS",
    "#:[E]S =", "#:[ELY] =nn I", "#:[EMENT]=PP E nn DD", "[EFUL]=FF U nn",
    "[EE]=I", "[EARN]=E nn", " [EAR]^=E", "[EAD]=E DD", "#:[EA] =I aa",
    "[EA]SU=E", "[EA]=I", "[EIGH]=E", "[EI]=I", " [EYE]=aa", "[EY]=I",
    "[EU]=I U", "[E]=E",
];

const RULES_F: &[&str] = &["[FUL]=FF U nn", "[F]=FF"];

const RULES_G: &[&str] = &[
    "[GIV]=kk I FF", " [G]I^=kk", "[GE]T=kk E", "SU[GGES]=kk CH E SS",
    "[GG]=kk", " B#[G]=kk", "[G]+=CH", "[GREAT]=kk RR E DD",
    "#[GH]=", "[G]=kk",
];

const RULES_H: &[&str] = &[
    " [HAV]=I aa FF", " [HERE]=I I RR", " [HOUR]=aa U E", "[HOW]=I aa",
    "[H]#=I", "[H]=",
];

const RULES_I: &[&str] = &[
    " [IN]=I nn", " [I] =aa", "[IN]D=aa nn", "[IER]=I E",
    "#:R[IED] =I", "[IED] =aa", "[IEN]=I E nn", "[IE]T=aa E",
    " :[I]%=aa", "[I]%=I", "[IE]=I", "[I]^+:#=I", "[IR]#=aa RR",
    "[IZ]%=aa SS", "[IS]%=aa SS", "[I]D%=aa", "+^[I]^+=I",
    "[I]T%=aa", "#^:[I]^+=I", "[I]^+=aa", "[IR]=E", "[IGH]=aa",
    "[ILD]=aa nn DD", "[IGN] =aa nn", "[IGN]^=aa nn", "[IGN]%=aa nn",
    "[IQUE]=I kk", "[I]=I",
];

const RULES_J: &[&str] = &["[J]=CH"];

const RULES_K: &[&str] = &[" [K]N=", "[K]=kk"];

const RULES_L: &[&str] = &[
    "[LO]C#=nn O", "L[L]=", "#^:[L]%=aa nn", "[LEAD]=nn I DD", "[L]=nn",
];

const RULES_M: &[&str] = &["[MOV]=PP U FF", "[M]=PP"];

const RULES_N: &[&str] = &[
    "E[NG]+=nn CH", "[NG]R=nn kk", "[NG]#=nn kk", "[NGL]%=nn kk aa nn",
    "[NG]=nn", "[NK]=nn kk", " [NOW] =nn aa", "[N]=nn",
];

const RULES_O: &[&str] = &[
    "[OF] =aa FF", "[OROUGH]=E O", "#:[OR] =E", "#:[ORS] =E SS",
    "[OR]=aa RR", " [ONE]=FF aa nn", "[OW]=O", " [OVER]=O FF E",
    "[OV]=aa FF", "[O]^%=O", "[O]^EN=O", "[O]^I#=O", "[OL]D=O nn",
    "[OUGHT]=aa DD", "[OUGH]=aa FF", " [OU]=aa", "H[OU]S#=aa",
    "[OUS]=aa SS", "[OUR]=aa RR", "[OULD]=U DD", "^[OU]^L=aa",
    "[OUP]=U PP", "[OU]=aa", "[OY]=O", "[OING]=O I nn", "[OI]=O",
    "[OOR]=aa RR", "[OOK]=U kk", "[OOD]=U DD", "[OO]=U", "[O]E=O",
    "[O] =O", "[OA]=O", " [ONLY]=O nn nn I", " [ONCE]=FF aa nn SS",
    "C[O]N=aa", "[O]NG=aa", " ^:[O]N=aa",
    "I[ON]=aa nn", "#:[ON] =aa nn", "#^[ON]=aa nn", "[O]ST =O",
    "[OF]^=aa FF", "[OTHER]=aa TH E", "[OSS] =aa SS", "#^:[OM]=aa PP",
    "[O]=aa",
];

const RULES_P: &[&str] = &[
    "[PH]=FF", "[PEOP]=PP I PP", "[POW]=PP aa", "[PUT] =PP U DD", "[P]=PP",
];

const RULES_Q: &[&str] = &["[QUAR]=kk FF aa RR", "[QU]=kk FF", "[Q]=kk"];

const RULES_R: &[&str] = &[" [RE]^#=RR I", "[R]=RR"];

const RULES_S: &[&str] = &[
    "[SH]=CH", "#[SION]=CH aa nn", "[SOME]=SS aa PP", "#[SUR]#=CH E",
    "[SUR]#=CH E", "#[SU]#=CH U", "#[SSU]#=CH U", "#[SED] =SS DD",
    "#[S]#=SS", "[SAID]=SS E DD", "^[SION]=CH aa nn", "[S]S=",
    ".[S] =SS", "#:.E[S] =SS", "#^:##[S] =SS", "#^:#[S] =SS",
    "U[S] =SS", " :#[S] =SS", " [SCH]=SS kk", "[S]C+=",
    "#[SM]=SS PP", "[S]=SS",
];

const RULES_T: &[&str] = &[
    " [THE] =TH aa", "[TO] =DD U", "[THAT] =TH aa DD", " [THIS] =TH I SS",
    " [THEY]=TH E", " [THERE]=TH E RR", "[THER]=TH E", "[THEIR]=TH E RR",
    " [THAN] =TH aa nn", " [THEM] =TH E PP", "[THESE] =TH I SS",
    " [THEN]=TH E nn", "[THROUGH]=TH RR U", "[THOSE]=TH O SS",
    "[THOUGH] =TH O", " [THUS]=TH aa SS", "[TH]=TH", "#:[TED] =DD I DD",
    "S[TI]#N=CH", "[TI]O=CH", "[TI]A=CH", "[TIEN]=CH aa nn",
    "[TUR]#=CH E", "[TU]A=CH U", " [TWO]=DD U", "[T]=DD",
];

const RULES_U: &[&str] = &[
    " [UN]I=I U nn", " [UN]=aa nn", " [UPON]=aa PP O nn",
    "@[UR]#=U RR", "[UR]#=I U RR", "[UR]^=E", "[U]^ =aa",
    "[U]^^=aa", "[UY]=aa", " G[U]#=", "G[U]%=", "G[U]#=FF",
    "#N[U]=I U", "@[U]=I", "[U]=I U",
];

const RULES_V: &[&str] = &["[VIEW]=FF I U", "[V]=FF"];

const RULES_W: &[&str] = &[
    " [WERE]=FF E", "[WA]S=FF aa", "[WA]T=FF aa", "[WHERE]=FF E RR",
    "[WHAT]=FF aa DD", "[WHOL]=I O nn", "[WHO]=I U", "[WH]=FF",
    "[WAR]=FF aa RR", "[WOR]^=FF E", "[WR]=RR", "[W]=FF",
];

const RULES_X: &[&str] = &[" [X]=SS", "[X]=kk SS"];

const RULES_Y: &[&str] = &[
    "[YOUNG]=I aa nn", " [YOU]=I U", " [YES]=I E SS", " [Y]=I",
    "#^:[Y] =I", "#^:[Y]I=I", " :[Y] =aa", " :[Y]#=aa",
    " :[Y]^+:#=I", " :[Y]^#=I", "[Y]=I",
];

const RULES_Z: &[&str] = &["[Z]=SS"];

/// The English rule table, keyed by leading letter.
pub const ENGLISH_RULES: &[(char, &[&str])] = &[
    ('A', RULES_A),
    ('B', RULES_B),
    ('C', RULES_C),
    ('D', RULES_D),
    ('E', RULES_E),
    ('F', RULES_F),
    ('G', RULES_G),
    ('H', RULES_H),
    ('I', RULES_I),
    ('J', RULES_J),
    ('K', RULES_K),
    ('L', RULES_L),
    ('M', RULES_M),
    ('N', RULES_N),
    ('O', RULES_O),
    ('P', RULES_P),
    ('Q', RULES_Q),
    ('R', RULES_R),
    ('S', RULES_S),
    ('T', RULES_T),
    ('U', RULES_U),
    ('V', RULES_V),
    ('W', RULES_W),
    ('X', RULES_X),
    ('Y', RULES_Y),
    ('Z', RULES_Z),
];

/// English phonetic processor: text normalizer plus compiled rule table.
#[derive(Debug, Clone)]
pub struct EnglishProcessor {
    rules: RuleSet,
}

impl EnglishProcessor {
    /// Compile the English rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in table contains a malformed rule.
    pub fn new() -> Result<Self> {
        let rules = RuleSet::compile(ENGLISH_RULES)?;
        tracing::debug!(rules = rules.len(), "compiled English letter-to-sound rules");
        Ok(Self { rules })
    }

    /// The compiled rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl LipsyncProcessor for EnglishProcessor {
    fn language(&self) -> &str {
        "en"
    }

    fn normalize(&self, raw: &str, expand_numbers: bool) -> String {
        normalize(raw, expand_numbers)
    }

    fn word_to_visemes(&self, word: &str) -> Option<WordVisemeResult> {
        word_to_visemes(&self.rules, word)
    }
}
