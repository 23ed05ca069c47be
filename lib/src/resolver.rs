use crate::catalog::{Catalog, CatalogEntry, CategoryDescriptor, QuestionTypeDescriptor};

pub const QUESTION_TYPE_PREFIX: &str = "qt_";
pub const CATEGORY_PREFIX: &str = "cat_";

/// Free-text question type names and the catalog code they stand for.
pub const QUESTION_TYPE_ALIASES: &[(&str, &str)] = &[
    ("mcq", "single_choice"),
    ("scq", "single_choice"),
    ("single", "single_choice"),
    ("single choice", "single_choice"),
    ("single-choice", "single_choice"),
    ("single answer", "single_choice"),
    ("radio", "single_choice"),
    ("msq", "multiple_choice"),
    ("multiple choice", "multiple_choice"),
    ("multiple-choice", "multiple_choice"),
    ("multi choice", "multiple_choice"),
    ("multiple select", "multiple_choice"),
    ("multi select", "multiple_choice"),
    ("multiple answer", "multiple_choice"),
    ("checkbox", "multiple_choice"),
    ("true/false", "true_false"),
    ("true / false", "true_false"),
    ("true false", "true_false"),
    ("true or false", "true_false"),
    ("t/f", "true_false"),
    ("tf", "true_false"),
    ("boolean", "true_false"),
    ("yes/no", "true_false"),
    ("short answer", "short_answer"),
    ("short", "short_answer"),
    ("short text", "short_answer"),
    ("long answer", "long_answer"),
    ("essay", "long_answer"),
    ("paragraph", "long_answer"),
    ("descriptive", "long_answer"),
    ("fill in the blank", "fill_in_the_blank"),
    ("fill in the blanks", "fill_in_the_blank"),
    ("fill blank", "fill_in_the_blank"),
    ("fib", "fill_in_the_blank"),
    ("cloze", "fill_in_the_blank"),
    ("numerical", "numeric"),
    ("number", "numeric"),
    ("integer", "numeric"),
    ("code", "coding"),
    ("programming", "coding"),
    ("coding question", "coding"),
];

/// Free-text category names and the catalog code they stand for.
pub const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("tech", "technical"),
    ("programming", "coding"),
    ("code", "coding"),
    ("gk", "general"),
    ("general knowledge", "general"),
    ("logic", "reasoning"),
    ("logical", "reasoning"),
    ("logical reasoning", "reasoning"),
    ("verbal", "verbal_ability"),
    ("english", "verbal_ability"),
    ("quant", "quantitative_aptitude"),
    ("quantitative", "quantitative_aptitude"),
    ("aptitude", "quantitative_aptitude"),
];

pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn lookup_alias(normalized: &str, aliases: &[(&str, &'static str)]) -> Option<&'static str> {
    aliases
        .iter()
        .find(|(synonym, _)| *synonym == normalized)
        .map(|(_, target)| *target)
}

/// Finds the catalog entry a free-text value refers to.
///
/// Tried in order, first hit wins:
/// 1. a value starting with `prefix` is looked up as an exact id;
/// 2. the trimmed, lower-cased value is compared with every field of every
///    entry;
/// 3. the value is mapped through `aliases` and the target compared with each
///    entry's code, and with its label reading underscores as spaces.
pub fn resolve<'a, T: CatalogEntry>(
    raw: &str,
    entries: &'a [T],
    prefix: &str,
    aliases: &[(&str, &'static str)],
) -> Option<&'a T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with(prefix) {
        if let Some(entry) = entries.iter().find(|entry| entry.id() == trimmed) {
            return Some(entry);
        }
    }

    let needle = normalize(trimmed);
    let direct = entries.iter().find(|entry| {
        entry
            .match_fields()
            .into_iter()
            .any(|field| !field.trim().is_empty() && normalize(field) == needle)
    });
    if direct.is_some() {
        return direct;
    }

    let target = lookup_alias(&needle, aliases)?;
    let target_label = target.replace('_', " ");

    entries.iter().find(|entry| {
        normalize(entry.code()) == target
            || normalize(&entry.label().replace('_', " ")) == target_label
    })
}

pub fn resolve_question_type<'a>(
    raw: &str,
    catalog: &'a Catalog,
) -> Option<&'a QuestionTypeDescriptor> {
    resolve(
        raw,
        &catalog.question_types,
        QUESTION_TYPE_PREFIX,
        QUESTION_TYPE_ALIASES,
    )
}

pub fn resolve_category<'a>(raw: &str, catalog: &'a Catalog) -> Option<&'a CategoryDescriptor> {
    resolve(raw, &catalog.categories, CATEGORY_PREFIX, CATEGORY_ALIASES)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::catalog::{Catalog, CategoryDescriptor, QuestionTypeDescriptor};

    pub fn question_type(
        id: &str,
        label: &str,
        code: &str,
        category_id: &str,
    ) -> QuestionTypeDescriptor {
        QuestionTypeDescriptor {
            id: id.to_owned(),
            label: label.to_owned(),
            name: label.to_lowercase(),
            type_name: code.to_owned(),
            code: code.to_owned(),
            category_id: category_id.to_owned(),
            enabled: true,
        }
    }

    pub fn category(id: &str, label: &str, code: &str) -> CategoryDescriptor {
        CategoryDescriptor {
            id: id.to_owned(),
            label: label.to_owned(),
            name: label.to_lowercase(),
            code: code.to_owned(),
            enabled: true,
        }
    }

    pub fn catalog() -> Catalog {
        Catalog::new(
            vec![
                question_type("qt_single", "Single Choice", "single_choice", "cat_objective"),
                question_type("qt_multi", "Multiple Select", "multiple_choice", "cat_objective"),
                question_type("qt_bool", "Binary", "true_false", "cat_objective"),
                question_type("qt_essay", "Essay Writing", "long_answer", ""),
            ],
            vec![
                category("cat_objective", "Objective", "objective"),
                category("cat_coding", "Coding", "coding"),
                category("cat_quant", "Quantitative_Aptitude", "quant_apt"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{catalog, question_type};
    use super::*;

    #[test]
    fn prefixed_id_wins_over_other_fields() {
        let mut catalog = catalog();
        // An earlier entry whose label collides with a later entry's id.
        catalog
            .question_types
            .insert(0, question_type("qt_decoy", "qt_bool", "decoy", ""));

        let entry = resolve_question_type("qt_bool", &catalog).unwrap();

        assert_eq!(entry.id, "qt_bool");
    }

    #[test]
    fn normalized_match_checks_every_field() {
        let catalog = catalog();

        assert_eq!(resolve_question_type("  SINGLE CHOICE ", &catalog).unwrap().id, "qt_single");
        assert_eq!(resolve_question_type("multiple_choice", &catalog).unwrap().id, "qt_multi");
        assert_eq!(resolve_question_type("essay writing", &catalog).unwrap().id, "qt_essay");
    }

    #[test]
    fn alias_resolves_to_entry_code() {
        let catalog = catalog();

        assert_eq!(resolve_question_type("True/False", &catalog).unwrap().id, "qt_bool");
        assert_eq!(resolve_question_type("MCQ", &catalog).unwrap().id, "qt_single");
        assert_eq!(resolve_question_type("Essay", &catalog).unwrap().id, "qt_essay");
    }

    #[test]
    fn alias_compares_label_with_underscores_as_spaces() {
        let catalog = catalog();

        let entry = resolve_category("Aptitude", &catalog).unwrap();

        assert_eq!(entry.id, "cat_quant");
    }

    #[test]
    fn unknown_values_do_not_match() {
        let catalog = catalog();

        assert!(resolve_question_type("matching", &catalog).is_none());
        assert!(resolve_question_type("   ", &catalog).is_none());
        assert!(resolve_question_type("qt_missing", &catalog).is_none());
        assert!(resolve_category("history", &catalog).is_none());
    }
}
