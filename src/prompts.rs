//! Prompt composition for essay feedback
//!
//! Builds the two messages sent to the provider:
//! - a role block that depends only on the language
//! - a task block with unit, essay type, rubric, the essay and the fixed
//!   output template
//!
//! Both language variants are literal constants. Nothing here is translated
//! at runtime, so a Spanish request never picks up an English line.

use crate::curriculum::{rubric_summary, unit_title};
use crate::types::{EssayFeedbackRequest, Language};
use serde::Serialize;

const ROLE_EN: [&str; 5] = [
    "You are an AP U.S. History (APUSH) writing coach.",
    "Your job is to evaluate and teach: be clear, kind, and specific.",
    "Do NOT write a full essay for the student. Instead, correct and coach.",
    "Respond ONLY in English.",
    "Use an age-appropriate tone for high school students.",
];

const ROLE_ES: [&str; 5] = [
    "Eres un tutor de AP Historia de Estados Unidos (APUSH).",
    "Tu tarea es evaluar y enseñar: sé claro, amable y específico.",
    "NO escribas un ensayo completo por el estudiante. En su lugar, corrige y entrena.",
    "Responde SOLO en español.",
    "Usa un tono apropiado para estudiantes (secundaria/preparatoria).",
];

const TEMPLATE_EN: [&str; 9] = [
    "Return feedback in this format with headings:",
    "1) Estimated score (unofficial) and why",
    "2) Strengths (2–4 bullets)",
    "3) What to add to earn missing points (2–4 bullets)",
    "4) Sentence-level fixes: quote 3–6 student sentences and propose improved versions (same idea, clearer and more precise).",
    "5) Suggested outside evidence (2–4 concrete ideas tied to the unit)",
    "6) Next step: 1 mini-task to improve today (10–15 min)",
    "",
    "Be specific: address thesis, contextualization, evidence, analysis & reasoning, and complexity as appropriate to the essay type.",
];

const TEMPLATE_ES: [&str; 9] = [
    "Devuelve retroalimentación en este formato con encabezados:",
    "1) Puntaje estimado (no oficial) y por qué",
    "2) Fortalezas (2–4 viñetas)",
    "3) Lo que falta para subir de puntaje (2–4 viñetas)",
    "4) Correcciones a nivel de oración: cita 3–6 frases del estudiante y propone una versión mejorada (sin cambiar la idea, solo claridad/precisión).",
    "5) Evidencia externa sugerida (2–4 ideas concretas relacionadas con la unidad)",
    "6) Próximo paso: 1 mini-tarea para mejorar hoy (10–15 min)",
    "",
    "Sé específico: menciona tesis, contextualización, evidencia, análisis y razonamiento, y complejidad según el tipo.",
];

/// Labels for the task header, per language
struct TaskLabels {
    unit: &'static str,
    essay_type: &'static str,
    rubric: &'static str,
    essay: &'static str,
}

const LABELS_EN: TaskLabels = TaskLabels {
    unit: "Unit",
    essay_type: "Type",
    rubric: "Rubric (summary)",
    essay: "Student essay",
};

const LABELS_ES: TaskLabels = TaskLabels {
    unit: "Unidad",
    essay_type: "Tipo",
    rubric: "Rúbrica (resumen)",
    essay: "Ensayo del estudiante",
};

/// The composed message pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackPrompt {
    /// Style-setting (system) message
    pub role: String,
    /// Task (user) message: header, essay and output template
    pub task: String,
}

/// Role block for `language`
pub fn role_block(language: Language) -> String {
    match language {
        Language::En => ROLE_EN.join(" "),
        Language::Es => ROLE_ES.join(" "),
    }
}

/// Structured output template for `language`
pub fn output_template(language: Language) -> String {
    match language {
        Language::En => TEMPLATE_EN.join("\n"),
        Language::Es => TEMPLATE_ES.join("\n"),
    }
}

/// Task header plus the student's essay, without the template
pub fn task_block(request: &EssayFeedbackRequest) -> String {
    let labels = match request.language {
        Language::En => &LABELS_EN,
        Language::Es => &LABELS_ES,
    };
    let title = unit_title(request.unit_id, request.language);
    let rubric = rubric_summary(request.essay_type, request.language);

    format!(
        "{}: {} — {}\n{}: {}\n{}: {}\n\n{}:\n{}",
        labels.unit,
        request.unit_id,
        title,
        labels.essay_type,
        request.essay_type,
        labels.rubric,
        rubric,
        labels.essay,
        request.essay_text
    )
}

/// Build the full message pair for a validated request
pub fn compose(request: &EssayFeedbackRequest) -> FeedbackPrompt {
    FeedbackPrompt {
        role: role_block(request.language),
        task: format!(
            "{}\n\n{}",
            task_block(request),
            output_template(request.language)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EssayType, UnitId};

    fn request(language: Language) -> EssayFeedbackRequest {
        EssayFeedbackRequest {
            language,
            unit_id: UnitId::new(3).unwrap(),
            essay_type: EssayType::Leq,
            essay_text: "The Revolution was driven by economic grievances as much as ideology."
                .to_string(),
        }
    }

    #[test]
    fn test_english_prompt() {
        let prompt = compose(&request(Language::En));

        assert!(prompt.role.starts_with("You are an AP U.S. History (APUSH) writing coach."));
        assert!(prompt.role.contains("Do NOT write a full essay"));
        assert!(prompt.role.contains("Respond ONLY in English."));

        assert!(prompt
            .task
            .starts_with("Unit: 3 — American Revolution\nType: LEQ\nRubric (summary): LEQ: thesis"));
        assert!(prompt
            .task
            .contains("\n\nStudent essay:\nThe Revolution was driven by economic grievances"));
        assert!(prompt.task.ends_with(TEMPLATE_EN[8]));
    }

    #[test]
    fn test_spanish_prompt_has_no_english_lines() {
        let prompt = compose(&request(Language::Es));

        assert!(prompt.role.contains("Responde SOLO en español."));
        assert!(prompt.task.starts_with("Unidad: 3 — Revolución estadounidense\nTipo: LEQ"));
        assert!(prompt.task.contains("Rúbrica (resumen): LEQ: tesis"));
        assert!(prompt.task.contains("Ensayo del estudiante:\n"));

        for line in ROLE_EN {
            assert!(!prompt.role.contains(line));
        }
        for line in TEMPLATE_EN.iter().filter(|l| !l.is_empty()) {
            assert!(!prompt.task.contains(line), "english line leaked: {}", line);
        }
    }

    #[test]
    fn test_role_ignores_request_fields() {
        let mut other = request(Language::En);
        other.essay_type = EssayType::Saq;
        other.unit_id = UnitId::new(9).unwrap();
        assert_eq!(compose(&other).role, compose(&request(Language::En)).role);
    }

    #[test]
    fn test_template_has_six_sections_in_order() {
        for language in Language::ALL {
            let template = output_template(language);
            let positions: Vec<usize> = (1..=6)
                .map(|n| template.find(&format!("{})", n)).expect("section"))
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_template_follows_essay_after_blank_line() {
        let req = request(Language::En);
        let prompt = compose(&req);
        let expected = format!("{}\n\n{}", task_block(&req), output_template(Language::En));
        assert_eq!(prompt.task, expected);
    }
}
