//! Static course metadata used to build prompts
//!
//! Unit titles and rubric summaries are fixed at compile time. Lookups go
//! through `match` tables so there is no global state to initialize.

use crate::types::{EssayType, Language, UnitId};
use std::borrow::Cow;

/// Bilingual title for one curriculum unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitTitle {
    pub en: &'static str,
    pub es: &'static str,
}

impl UnitTitle {
    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.en,
            Language::Es => self.es,
        }
    }
}

const UNIT_TITLES: [UnitTitle; 9] = [
    UnitTitle {
        en: "Native American Societies & European Colonization",
        es: "Sociedades indígenas y colonización europea",
    },
    UnitTitle {
        en: "Colonial Society & British Empire",
        es: "Sociedad colonial e Imperio británico",
    },
    UnitTitle {
        en: "American Revolution",
        es: "Revolución estadounidense",
    },
    UnitTitle {
        en: "Constitution & New Republic",
        es: "Constitución y nueva república",
    },
    UnitTitle {
        en: "Sectionalism & Reform",
        es: "Seccionalismo y reforma",
    },
    UnitTitle {
        en: "Civil War & Reconstruction",
        es: "Guerra Civil y Reconstrucción",
    },
    UnitTitle {
        en: "Industrialization & Gilded Age",
        es: "Industrialización y Era Dorada",
    },
    UnitTitle {
        en: "Progressivism, WWI, Great Depression, WWII",
        es: "Progresismo, WWI, Gran Depresión, WWII",
    },
    UnitTitle {
        en: "Cold War to Modern America",
        es: "Guerra Fría hasta la América moderna",
    },
];

/// Table entry for a unit, if one exists
pub fn unit_metadata(unit: UnitId) -> Option<&'static UnitTitle> {
    UNIT_TITLES.get(usize::from(unit.get()).checked_sub(1)?)
}

/// Title of `unit` in `language`, or a synthesized `Unit {id}` label
pub fn unit_title(unit: UnitId, language: Language) -> Cow<'static, str> {
    match unit_metadata(unit) {
        Some(title) => Cow::Borrowed(title.get(language)),
        // Unreachable while the table covers every `UnitId`; kept as a guard
        None => Cow::Owned(format!("Unit {}", unit)),
    }
}

/// Short grading-criteria summary for an essay type
pub fn rubric_summary(essay_type: EssayType, language: Language) -> &'static str {
    match (language, essay_type) {
        (Language::En, EssayType::Saq) => {
            "SAQ (Short Answer): answer all parts, use specific evidence, and explain reasoning clearly."
        }
        (Language::En, EssayType::Leq) => {
            "LEQ: thesis, contextualization, evidence, analysis & reasoning (causation/CCOT/comparison), and complexity."
        }
        (Language::En, EssayType::Dbq) => {
            "DBQ: thesis, contextualization, evidence from documents, sourcing (HIPP), outside evidence, analysis & reasoning, and complexity."
        }
        (Language::Es, EssayType::Saq) => {
            "SAQ (Respuesta corta): responde todas las partes, usa evidencia específica y explica el razonamiento con claridad."
        }
        (Language::Es, EssayType::Leq) => {
            "LEQ: tesis, contextualización, evidencia, análisis y razonamiento (causación/CCOT/comparación) y complejidad."
        }
        (Language::Es, EssayType::Dbq) => {
            "DBQ: tesis, contextualización, evidencia de documentos, sourcing (HIPP), evidencia externa, análisis y razonamiento y complejidad."
        }
    }
}
