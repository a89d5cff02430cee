//! The guided question graph.
//!
//! A static ordered list of plain descriptors — no hierarchy. Skip
//! predicates are pure `fn(&record, entry_index) -> bool` pointers; a
//! predicate that cannot resolve its data answers "ask the question", never
//! "skip". Per-entry questions carry a `{i}` placeholder in their field path
//! that the engine resolves against the section's entry counter, so the same
//! descriptor serves the first job and the fourth.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flow::Category;
use crate::record::ResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Multiline,
    Confirm,
    Select,
    Phone,
    Email,
}

pub struct Question {
    pub id: &'static str,
    pub category: Category,
    /// Where the answer lands in the record. `None` for control-only
    /// questions (add-another, review confirmation).
    pub field_path: Option<&'static str>,
    pub input_kind: InputKind,
    pub is_required: bool,
    /// Detail question of a gated section: skipped wholesale when the
    /// section's gate flag is explicitly `false`.
    pub gated: bool,
    pub skip: Option<fn(&ResumeRecord, usize) -> bool>,
    pub prompt_en: &'static str,
    pub prompt_es: &'static str,
}

impl Question {
    /// Resolves `{i}` in the field path against the current entry index.
    pub fn resolved_path(&self, entry_index: usize) -> Option<String> {
        self.field_path
            .map(|p| p.replace("{i}", &entry_index.to_string()))
    }
}

fn bool_at(record: &ResumeRecord, path: &str) -> Option<bool> {
    record.get(path).and_then(Value::as_bool)
}

fn skip_if_no_email(record: &ResumeRecord, _entry: usize) -> bool {
    bool_at(record, "personalInfo.noEmail").unwrap_or(false)
}

fn skip_if_current_job(record: &ResumeRecord, entry: usize) -> bool {
    bool_at(record, &format!("workExperience[{entry}].isCurrent")).unwrap_or(false)
}

fn skip_if_has_references(record: &ResumeRecord, _entry: usize) -> bool {
    record.gate_flag("hasReferences") == Some(true)
}

fn skip_if_no_technical(record: &ResumeRecord, _entry: usize) -> bool {
    record.gate_flag("hasTechnicalSkills") == Some(false)
}

fn skip_if_no_soft(record: &ResumeRecord, _entry: usize) -> bool {
    record.gate_flag("hasSoftSkills") == Some(false)
}

fn skip_if_no_certifications(record: &ResumeRecord, _entry: usize) -> bool {
    record.gate_flag("hasCertifications") == Some(false)
}

fn skip_if_no_languages(record: &ResumeRecord, _entry: usize) -> bool {
    record.gate_flag("hasLanguages") == Some(false)
}

pub static QUESTION_GRAPH: &[Question] = &[
    Question {
        id: "language_select",
        category: Category::Language,
        field_path: Some("language"),
        input_kind: InputKind::Select,
        is_required: true,
        gated: false,
        skip: None,
        prompt_en: "Hi! Would you like to continue in English or Spanish?",
        prompt_es: "¡Hola! ¿Prefiere continuar en inglés o en español?",
    },
    Question {
        id: "intro_objective",
        category: Category::Intro,
        field_path: Some("personalInfo.objective"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "What kind of job are you looking for?",
        prompt_es: "¿Qué tipo de trabajo está buscando?",
    },
    Question {
        id: "personal_name",
        category: Category::Personal,
        field_path: Some("personalInfo.fullName"),
        input_kind: InputKind::Text,
        is_required: true,
        gated: false,
        skip: None,
        prompt_en: "What is your full name?",
        prompt_es: "¿Cuál es su nombre completo?",
    },
    Question {
        id: "personal_email",
        category: Category::Personal,
        field_path: Some("personalInfo.email"),
        input_kind: InputKind::Email,
        is_required: true,
        gated: false,
        skip: Some(skip_if_no_email),
        prompt_en: "What email address should employers use to reach you?",
        prompt_es: "¿Qué correo electrónico pueden usar los empleadores para contactarle?",
    },
    Question {
        id: "personal_phone",
        category: Category::Personal,
        field_path: Some("personalInfo.phone"),
        input_kind: InputKind::Phone,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "What is a good phone number for you?",
        prompt_es: "¿Cuál es un buen número de teléfono para usted?",
    },
    Question {
        id: "personal_location",
        category: Category::Personal,
        field_path: Some("personalInfo.location"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "What city and state do you live in?",
        prompt_es: "¿En qué ciudad y estado vive?",
    },
    Question {
        id: "work_has",
        category: Category::Work,
        field_path: Some("hasWorkExperience"),
        input_kind: InputKind::Confirm,
        is_required: true,
        gated: false,
        skip: None,
        prompt_en: "Have you had any jobs before, paid or unpaid?",
        prompt_es: "¿Ha tenido algún trabajo antes, pagado o no pagado?",
    },
    Question {
        id: "work_company_1",
        category: Category::Work,
        field_path: Some("workExperience[{i}].company"),
        input_kind: InputKind::Text,
        is_required: true,
        gated: true,
        skip: None,
        prompt_en: "Where did you work? Tell me the company or employer name.",
        prompt_es: "¿Dónde trabajó? Dígame el nombre de la empresa o empleador.",
    },
    Question {
        id: "work_title_1",
        category: Category::Work,
        field_path: Some("workExperience[{i}].jobTitle"),
        input_kind: InputKind::Text,
        is_required: true,
        gated: true,
        skip: None,
        prompt_en: "What was your job title or role there?",
        prompt_es: "¿Cuál era su puesto o función allí?",
    },
    Question {
        id: "work_start_1",
        category: Category::Work,
        field_path: Some("workExperience[{i}].startDate"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "When did you start there? A month and year is fine.",
        prompt_es: "¿Cuándo comenzó allí? Con el mes y el año es suficiente.",
    },
    Question {
        id: "work_current_1",
        category: Category::Work,
        field_path: Some("workExperience[{i}].isCurrent"),
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "Are you still working there?",
        prompt_es: "¿Todavía trabaja allí?",
    },
    Question {
        id: "work_end_1",
        category: Category::Work,
        field_path: Some("workExperience[{i}].endDate"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: Some(skip_if_current_job),
        prompt_en: "When did you stop working there?",
        prompt_es: "¿Cuándo dejó de trabajar allí?",
    },
    Question {
        id: "work_responsibilities_1",
        category: Category::Work,
        field_path: Some("workExperience[{i}].responsibilities"),
        input_kind: InputKind::Multiline,
        is_required: true,
        gated: true,
        skip: None,
        prompt_en: "What did you do there day to day? Anything you were proud of?",
        prompt_es: "¿Qué hacía allí en el día a día? ¿Algo de lo que esté orgulloso?",
    },
    Question {
        id: "work_add_another",
        category: Category::Work,
        field_path: None,
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "Do you have another job you'd like to add?",
        prompt_es: "¿Tiene otro trabajo que quiera agregar?",
    },
    Question {
        id: "edu_has",
        category: Category::Education,
        field_path: Some("hasEducation"),
        input_kind: InputKind::Confirm,
        is_required: true,
        gated: false,
        skip: None,
        prompt_en: "Did you go to school or finish any education or training programs?",
        prompt_es: "¿Fue a la escuela o terminó algún programa de educación o capacitación?",
    },
    Question {
        id: "edu_school_1",
        category: Category::Education,
        field_path: Some("education[{i}].school"),
        input_kind: InputKind::Text,
        is_required: true,
        gated: true,
        skip: None,
        prompt_en: "What school or program was it?",
        prompt_es: "¿Qué escuela o programa fue?",
    },
    Question {
        id: "edu_credential_1",
        category: Category::Education,
        field_path: Some("education[{i}].credential"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "What degree, diploma, or certificate did you earn there?",
        prompt_es: "¿Qué título, diploma o certificado obtuvo allí?",
    },
    Question {
        id: "edu_year_1",
        category: Category::Education,
        field_path: Some("education[{i}].completionYear"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "What year did you finish, or expect to finish?",
        prompt_es: "¿En qué año terminó, o espera terminar?",
    },
    Question {
        id: "edu_add_another",
        category: Category::Education,
        field_path: None,
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "Any other school or training to add?",
        prompt_es: "¿Alguna otra escuela o capacitación que agregar?",
    },
    Question {
        id: "vol_has",
        category: Category::Volunteering,
        field_path: Some("hasVolunteering"),
        input_kind: InputKind::Confirm,
        is_required: true,
        gated: false,
        skip: None,
        prompt_en: "Have you done any volunteer work, at church, school, or in your community?",
        prompt_es: "¿Ha hecho trabajo voluntario, en la iglesia, la escuela o su comunidad?",
    },
    Question {
        id: "vol_org_1",
        category: Category::Volunteering,
        field_path: Some("volunteering[{i}].organization"),
        input_kind: InputKind::Text,
        is_required: true,
        gated: true,
        skip: None,
        prompt_en: "Where did you volunteer?",
        prompt_es: "¿Dónde hizo el voluntariado?",
    },
    Question {
        id: "vol_role_1",
        category: Category::Volunteering,
        field_path: Some("volunteering[{i}].role"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "What did you do there?",
        prompt_es: "¿Qué hacía allí?",
    },
    Question {
        id: "vol_description_1",
        category: Category::Volunteering,
        field_path: Some("volunteering[{i}].description"),
        input_kind: InputKind::Multiline,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "Tell me a little more about it — how often, and what it involved.",
        prompt_es: "Cuénteme un poco más: con qué frecuencia y en qué consistía.",
    },
    Question {
        id: "vol_add_another",
        category: Category::Volunteering,
        field_path: None,
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "Any other volunteer work to add?",
        prompt_es: "¿Algún otro trabajo voluntario que agregar?",
    },
    Question {
        id: "skills_overview",
        category: Category::Skills,
        field_path: Some("skills.summary"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "Let's talk about your skills. What would you say you're best at?",
        prompt_es: "Hablemos de sus habilidades. ¿En qué diría que es mejor?",
    },
    Question {
        id: "skills_technical_has",
        category: Category::Skills,
        field_path: Some("hasTechnicalSkills"),
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "Do you have technical skills, like computers, machinery, or tools?",
        prompt_es: "¿Tiene habilidades técnicas, como computadoras, maquinaria o herramientas?",
    },
    Question {
        id: "skills_technical",
        category: Category::Skills,
        field_path: Some("skills.technicalSkills"),
        input_kind: InputKind::Multiline,
        is_required: false,
        gated: false,
        skip: Some(skip_if_no_technical),
        prompt_en: "Which technical skills? List as many as you can.",
        prompt_es: "¿Cuáles habilidades técnicas? Mencione todas las que pueda.",
    },
    Question {
        id: "skills_soft_has",
        category: Category::Skills,
        field_path: Some("hasSoftSkills"),
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "How about people skills, like teamwork, patience, or being on time?",
        prompt_es: "¿Y habilidades personales, como trabajo en equipo, paciencia o puntualidad?",
    },
    Question {
        id: "skills_soft",
        category: Category::Skills,
        field_path: Some("skills.softSkills"),
        input_kind: InputKind::Multiline,
        is_required: false,
        gated: false,
        skip: Some(skip_if_no_soft),
        prompt_en: "Which ones describe you best?",
        prompt_es: "¿Cuáles le describen mejor?",
    },
    Question {
        id: "skills_certifications_has",
        category: Category::Skills,
        field_path: Some("hasCertifications"),
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "Do you have any certifications or licenses, like a driver's license or food handler card?",
        prompt_es: "¿Tiene certificaciones o licencias, como licencia de conducir o tarjeta de manipulador de alimentos?",
    },
    Question {
        id: "skills_certifications",
        category: Category::Skills,
        field_path: Some("skills.certifications"),
        input_kind: InputKind::Multiline,
        is_required: false,
        gated: false,
        skip: Some(skip_if_no_certifications),
        prompt_en: "Which certifications or licenses do you have?",
        prompt_es: "¿Qué certificaciones o licencias tiene?",
    },
    Question {
        id: "skills_languages_has",
        category: Category::Skills,
        field_path: Some("hasLanguages"),
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "Do you speak more than one language?",
        prompt_es: "¿Habla más de un idioma?",
    },
    Question {
        id: "skills_languages",
        category: Category::Skills,
        field_path: Some("skills.languages"),
        input_kind: InputKind::Multiline,
        is_required: false,
        gated: false,
        skip: Some(skip_if_no_languages),
        prompt_en: "Which languages do you speak?",
        prompt_es: "¿Qué idiomas habla?",
    },
    Question {
        id: "ref_has",
        category: Category::References,
        field_path: Some("hasReferences"),
        input_kind: InputKind::Confirm,
        is_required: true,
        gated: false,
        skip: None,
        prompt_en: "Do you have people who could vouch for your work, like a former boss or teacher?",
        prompt_es: "¿Tiene personas que puedan dar referencias de su trabajo, como un exjefe o maestro?",
    },
    Question {
        id: "ref_upon_request",
        category: Category::References,
        field_path: Some("referencesUponRequest"),
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: false,
        skip: Some(skip_if_has_references),
        prompt_en: "No problem. Should we note that references are available upon request?",
        prompt_es: "No hay problema. ¿Anotamos que las referencias están disponibles a solicitud?",
    },
    Question {
        id: "ref_name_1",
        category: Category::References,
        field_path: Some("references[{i}].name"),
        input_kind: InputKind::Text,
        is_required: true,
        gated: true,
        skip: None,
        prompt_en: "Great. What is the first reference's name?",
        prompt_es: "Excelente. ¿Cuál es el nombre de la primera referencia?",
    },
    Question {
        id: "ref_relationship_1",
        category: Category::References,
        field_path: Some("references[{i}].relationship"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "How do they know you — boss, coworker, teacher?",
        prompt_es: "¿Cómo le conocen? ¿Jefe, compañero, maestro?",
    },
    Question {
        id: "ref_contact_1",
        category: Category::References,
        field_path: Some("references[{i}].contact"),
        input_kind: InputKind::Text,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "What is a phone number or email for them?",
        prompt_es: "¿Cuál es su teléfono o correo electrónico?",
    },
    Question {
        id: "ref_add_another",
        category: Category::References,
        field_path: None,
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: true,
        skip: None,
        prompt_en: "Would you like to add another reference?",
        prompt_es: "¿Quiere agregar otra referencia?",
    },
    Question {
        id: "review_confirm",
        category: Category::Review,
        field_path: None,
        input_kind: InputKind::Confirm,
        is_required: false,
        gated: false,
        skip: None,
        prompt_en: "That's everything! I'll show you what we have. Does it all look right?",
        prompt_es: "¡Eso es todo! Le muestro lo que tenemos. ¿Está todo correcto?",
    },
];

/// Index of the first question in a category, if the category has any.
pub fn first_question_index(category: Category) -> Option<usize> {
    QUESTION_GRAPH.iter().position(|q| q.category == category)
}

/// Index of the first per-entry detail question in a gated section — where
/// the cursor loops back to after "add another".
pub fn first_detail_index(category: Category) -> Option<usize> {
    QUESTION_GRAPH
        .iter()
        .position(|q| q.category == category && q.gated)
}

/// Sections whose flow opens with a yes/no gate question. Derived from the
/// graph rather than hand-maintained: in these sections a standalone "no"
/// is a legitimate gate answer, not a request to bail out.
pub fn confirm_gated_categories() -> Vec<Category> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for q in QUESTION_GRAPH {
        if seen.contains(&q.category) {
            continue;
        }
        seen.push(q.category);
        if q.input_kind == InputKind::Confirm && q.category.gated_section().is_some() {
            out.push(q.category);
        }
    }
    out
}
