//! End-to-end tests of the mapping pipeline.

mod common;

use std::io::Cursor;
use std::ops::ControlFlow;
use std::sync::Arc;

use common::{create_book_record, create_serial_record, encode_records};
use marcsift::{
    CancelToken, Callable, Document, DuplicateFields, MarcReader, Mapper, MapperConfig, Record,
    RecordContext, SiftError, Stage, Value,
};

fn collect(mapper: &Mapper<Record>, records: Vec<Record>) -> Vec<Document> {
    let mut docs = Vec::new();
    mapper
        .process(records, |doc| {
            docs.push(doc);
            Ok(ControlFlow::Continue(()))
        })
        .expect("processing failed");
    docs
}

fn title_mapper() -> Mapper<Record> {
    let mut mapper = Mapper::new();
    mapper
        .map_marc("id", "001")
        .unwrap()
        .map_marc("title_t", ["245a"])
        .unwrap()
        .map_marc("subject_t", ["650a", "650v"])
        .unwrap()
        .clean_documents()
        .unwrap();
    mapper
}

#[test]
fn test_two_records_from_binary_in_order() {
    let bytes = encode_records(&[create_book_record(), create_serial_record()]);
    let mapper = title_mapper();

    let mut docs = Vec::new();
    let summary = mapper
        .process_results(MarcReader::new(Cursor::new(bytes)), |doc| {
            docs.push(doc);
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.emitted, 2);
    assert!(!summary.cancelled);

    assert_eq!(docs[0].get_text("id"), Some("ocm 00012345"));
    assert_eq!(docs[0].get("title_t"), Some(&Value::from(vec!["Moby Dick"])));
    assert_eq!(
        docs[0].get("subject_t"),
        Some(&Value::from(vec!["Whaling", "Fiction"]))
    );

    assert_eq!(docs[1].get_text("id"), Some("ser-77"));
    assert!(!docs[1].contains_key("subject_t"));
}

#[test]
fn test_keys_follow_rule_order_and_skip_absent_values() {
    let mut mapper = Mapper::new();
    mapper
        .map_marc("missing", "999a")
        .unwrap()
        .map_literal("source", "test")
        .unwrap()
        .map_marc("title", "245a")
        .unwrap();
    let docs = collect(&mapper, vec![create_serial_record()]);
    assert_eq!(docs[0].keys().collect::<Vec<_>>(), vec!["source", "title"]);
}

#[test]
fn test_duplicate_field_last_registration_wins() {
    let mut mapper = Mapper::new();
    mapper
        .map_literal("format", "Book")
        .unwrap()
        .map_marc("title", "245a")
        .unwrap()
        .map_literal("format", "Serial")
        .unwrap();
    let docs = collect(&mapper, vec![create_book_record()]);
    assert_eq!(docs[0].get_text("format"), Some("Serial"));
    assert_eq!(docs[0].len(), 2);
}

#[test]
fn test_duplicate_field_rejected_when_configured() {
    let mut mapper: Mapper<Record> = Mapper::with_config(MapperConfig {
        duplicate_fields: DuplicateFields::Reject,
    });
    mapper.map_literal("format", "Book").unwrap();
    let err = mapper.map_literal("format", "Serial").unwrap_err();
    assert!(matches!(err, SiftError::Configuration(_)));
    assert_eq!(mapper.rules().len(), 1);
}

#[test]
fn test_registration_after_processing_rejected() {
    let mut mapper = title_mapper();
    collect(&mapper, vec![create_book_record()]);
    assert!(matches!(
        mapper.map_literal("late", "x"),
        Err(SiftError::Configuration(_))
    ));
    assert!(matches!(
        mapper.after(Callable::supplier(|| Ok(()))),
        Err(SiftError::Configuration(_))
    ));
}

#[test]
fn test_before_hook_cancel_drops_current_record() {
    let mut mapper = title_mapper();
    mapper
        .before(Callable::transformer(|ctx: &mut RecordContext<Record>| {
            if ctx.index() == 1 {
                ctx.cancel();
            }
            Ok(())
        }))
        .unwrap();

    let mut docs = Vec::new();
    let summary = mapper
        .process(
            vec![create_book_record(), create_serial_record(), create_book_record()],
            |doc| {
                docs.push(doc);
                Ok(ControlFlow::Continue(()))
            },
        )
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.emitted, 1);
    assert!(summary.cancelled);
}

#[test]
fn test_external_token_stops_before_next_record() {
    let mapper = title_mapper();
    let token = CancelToken::new();
    let handle = token.clone();

    let summary = mapper
        .process_with_cancel(
            vec![create_book_record(), create_serial_record()],
            &token,
            |_doc| {
                handle.cancel();
                Ok(ControlFlow::Continue(()))
            },
        )
        .unwrap();

    assert_eq!(summary.emitted, 1);
    assert!(summary.cancelled);
}

#[test]
fn test_emit_break_stops_run() {
    let mapper = title_mapper();
    let summary = mapper
        .process(
            vec![create_book_record(), create_serial_record()],
            |_doc| Ok(ControlFlow::Break(())),
        )
        .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.emitted, 1);
}

#[test]
fn test_emit_error_propagates_unchanged() {
    let mapper = title_mapper();
    let err = mapper
        .process(vec![create_book_record()], |_doc| {
            Err(SiftError::Configuration("sink closed".to_string()))
        })
        .unwrap_err();
    assert!(matches!(err, SiftError::Configuration(msg) if msg == "sink closed"));
}

#[test]
fn test_unknown_capability_aborts_with_context() {
    let mut mapper: Mapper<Record> = Mapper::new();
    mapper.map_delegate("id", "control_code").unwrap();

    let mut emitted = 0;
    let err = mapper
        .process(vec![create_book_record()], |_doc| {
            emitted += 1;
            Ok(ControlFlow::Continue(()))
        })
        .unwrap_err();

    assert_eq!(emitted, 0);
    match &err {
        SiftError::RuleInvocation {
            stage,
            target,
            index,
            ..
        } => {
            assert_eq!(*stage, Stage::Rule);
            assert_eq!(target, "id");
            assert_eq!(*index, 0);
        },
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        err.root_cause(),
        SiftError::UnknownCapability(name) if name == "control_code"
    ));
}

#[test]
fn test_reader_error_aborts_run() {
    let mut bytes = encode_records(&[create_book_record(), create_serial_record()]);
    bytes.truncate(bytes.len() - 5);
    let mapper = title_mapper();

    let mut emitted = 0;
    let err = mapper
        .process_results(MarcReader::new(Cursor::new(bytes)), |_doc| {
            emitted += 1;
            Ok(ControlFlow::Continue(()))
        })
        .unwrap_err();

    assert_eq!(emitted, 1);
    assert!(matches!(err, SiftError::Marc(_)));
}

#[test]
fn test_record_attached_capability() {
    let mut mapper: Mapper<Record> = Mapper::new();
    mapper
        .before(Callable::transformer(|ctx: &mut RecordContext<Record>| {
            let position = ctx.index();
            ctx.attach_capability("position", move |_ctx, _args| {
                Ok(Some(Value::Text(position.to_string())))
            });
            Ok(())
        }))
        .unwrap()
        .map_delegate("position", "position")
        .unwrap();
    let docs = collect(&mapper, vec![create_book_record(), create_serial_record()]);
    assert_eq!(docs[1].get_text("position"), Some("1"));
}

#[test]
fn test_concurrent_runs_share_one_mapper() {
    let mapper = Arc::new(title_mapper());
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mapper = Arc::clone(&mapper);
                scope.spawn(move || collect(&mapper, vec![create_book_record()]))
            })
            .collect();
        for handle in handles {
            let docs = handle.join().unwrap();
            assert_eq!(docs[0].get("title_t"), Some(&Value::from(vec!["Moby Dick"])));
        }
    });
}
