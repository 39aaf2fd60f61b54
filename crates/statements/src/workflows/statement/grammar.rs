/// Gender of the student as reported by the survey. Anything outside the two
/// known labels behaves like the non-feminine branch everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Feminine,
    Masculine,
    Unknown,
}

impl Gender {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Женский" => Gender::Feminine,
            "Мужской" => Gender::Masculine,
            _ => Gender::Unknown,
        }
    }
}

/// Who is filing the statement. The survey offers one literal answer for the
/// student filing on their own behalf; every other answer means a parent or
/// guardian files for the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantRole {
    Student,
    Guardian,
}

impl ApplicantRole {
    pub fn from_label(label: &str) -> Self {
        if label.trim() == "Студент(ка)" {
            ApplicantRole::Student
        } else {
            ApplicantRole::Guardian
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicantRole::Student => "Студент(ка)",
            ApplicantRole::Guardian => "Родитель",
        }
    }
}

/// The grammatical fragments a template needs once role and gender are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarForms {
    pub possessive: &'static str,
    pub kinship: &'static str,
    pub absence_verb: &'static str,
    pub responsibility: &'static str,
}

const GUARDIAN_RESPONSIBILITY: &str = "за сохранность жизни и здоровья ребенка в указанный период, а также за освоение учебной программы, беру на себя";

/// Total over every (gender, role) pair; an unknown gender takes the
/// masculine guardian branch.
pub fn resolve(gender: Gender, role: ApplicantRole) -> GrammarForms {
    match role {
        ApplicantRole::Student => GrammarForms {
            possessive: "Я",
            kinship: "",
            absence_verb: "буду отсутствовать",
            responsibility: "за освоение учебного материала беру на себя",
        },
        ApplicantRole::Guardian => match gender {
            Gender::Feminine => GrammarForms {
                possessive: "Моя",
                kinship: "дочь",
                absence_verb: "будет отсутствовать",
                responsibility: GUARDIAN_RESPONSIBILITY,
            },
            Gender::Masculine | Gender::Unknown => GrammarForms {
                possessive: "Мой",
                kinship: "сын",
                absence_verb: "будет отсутствовать",
                responsibility: GUARDIAN_RESPONSIBILITY,
            },
        },
    }
}

/// Genitive form of a surname. A closed suffix table, not a morphological
/// analyzer: feminine surnames try "ая" -> "ой", then "а" -> "ой", then
/// "я" -> "ей"; no match falls through to the masculine rule of appending
/// "а".
pub fn decline_surname(surname: &str, gender: Gender) -> String {
    if surname.is_empty() {
        return String::new();
    }

    if gender == Gender::Feminine {
        if let Some(stem) = surname.strip_suffix("ая") {
            return format!("{stem}ой");
        }
        if let Some(stem) = surname.strip_suffix('а') {
            return format!("{stem}ой");
        }
        if let Some(stem) = surname.strip_suffix('я') {
            return format!("{stem}ей");
        }
    }

    format!("{surname}а")
}

/// Signature form "Фамилия И. О." built from a full name. Names that do not
/// split into at least surname, given name and patronymic are used verbatim.
/// The surname is declined first, matching how the signature reads in the
/// filled statement.
pub fn short_name(full_name: &str, gender: Gender) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    if parts.len() < 3 {
        return full_name.to_string();
    }

    let surname = decline_surname(parts[0], gender);
    let given_initial = parts[1].chars().next();
    let patronymic_initial = parts[2].chars().next();

    match (given_initial, patronymic_initial) {
        (Some(given), Some(patronymic)) => format!("{surname} {given}. {patronymic}."),
        _ => full_name.to_string(),
    }
}
