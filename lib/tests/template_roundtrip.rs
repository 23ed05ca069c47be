use question_uploader::sheet::read_workbook_bytes;
use question_uploader::template::{template_bytes, TEMPLATE_HEADERS};
use question_uploader::{convert_rows, Catalog, CategoryDescriptor, QuestionTypeDescriptor};

fn catalog() -> Catalog {
    let question_type = |id: &str, label: &str, code: &str| QuestionTypeDescriptor {
        id: id.to_owned(),
        label: label.to_owned(),
        code: code.to_owned(),
        category_id: "cat_general".to_owned(),
        ..QuestionTypeDescriptor::default()
    };

    Catalog::new(
        vec![
            question_type("qt_1", "Single Choice", "single_choice"),
            question_type("qt_2", "True or False", "true_false"),
        ],
        vec![CategoryDescriptor {
            id: "cat_general".to_owned(),
            label: "General".to_owned(),
            code: "general".to_owned(),
            ..CategoryDescriptor::default()
        }],
    )
}

#[test]
fn template_has_documented_headers() {
    let rows = read_workbook_bytes(template_bytes().unwrap()).unwrap();

    assert_eq!(rows.len(), 2);

    let headers: Vec<&str> = rows[0].iter().map(|(header, _)| header).collect();
    assert_eq!(headers, TEMPLATE_HEADERS);
}

#[test]
fn template_rows_convert_cleanly() {
    let rows = read_workbook_bytes(template_bytes().unwrap()).unwrap();

    let catalog = catalog();
    let report = convert_rows(&rows, &catalog);

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.questions.len(), 2);
    assert!(report.issues.is_empty(), "unexpected issues: {:?}", report.issues);

    let first = &report.questions[0];
    assert_eq!(first.question_type_id, "qt_1");
    assert_eq!(first.category_id, "cat_general");
    assert_eq!(first.concepts, vec!["Geography", "Capitals"]);
    assert_eq!(first.options.len(), 4);
    assert_eq!(first.correct_answers, vec!["Paris"]);

    let second = &report.questions[1];
    assert_eq!(second.question_type_id, "qt_2");
    assert_eq!(second.time_limit, 30);
    assert_eq!(second.options.len(), 2);
    assert_eq!(second.correct_answers, vec!["True"]);

    for question in &report.questions {
        let question_type = catalog.question_type(&question.question_type_id).unwrap();
        assert_eq!(question_type.category_id, question.category_id);
        assert!(catalog.category(&question.category_id).is_some());
    }
}
