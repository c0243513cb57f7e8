use std::fs;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use lead_enricher::pipeline::ingestion::load_path;
use lead_enricher::{EnricherError, InputFormat, LoadOptions, Pipeline, RecordFilter};
use tempfile::tempdir;

const PROSPECTS_CSV: &str = "\
Empresa,Nome,E-mail,Celular,Telefone
Alpha Ltda,Ana,ana@alpha.com.br,+55 (11) 98765-4321,
Beta ME,João,joao@gmail.com,,(21) 3333-4444
Gama SA,,,  ,
";

#[test]
fn test_csv_file_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("prospects.csv");
    fs::write(&path, PROSPECTS_CSV)?;

    let source = load_path(&path, &LoadOptions::default())?;
    assert_eq!(source.format, InputFormat::Csv);
    assert_eq!(source.records.len(), 3);
    assert_eq!(source.records[2].phone_primary, None);

    let pipeline = Pipeline::new();
    let table = pipeline.run_source(&source);

    let alpha = table.detail("Alpha Ltda").expect("alpha present");
    assert_eq!(alpha.area_code.as_deref(), Some("11"));
    assert_eq!(alpha.score, 2);

    let beta = table.detail("Beta ME").expect("beta present");
    assert_eq!(beta.phone_raw, "(21) 3333-4444");
    assert_eq!(beta.score, 1);

    let gama = table.detail("Gama SA").expect("gama present");
    assert_eq!(gama.phone_raw, "");
    assert!(!gama.is_corporate);
    assert_eq!(gama.score, 0);

    assert_eq!(table.area_code_options(), vec!["11", "21"]);
    Ok(())
}

#[test]
fn test_semicolon_delimited_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("prospects.txt");
    fs::write(&path, "company;email;phone_primary\nACME;vendas@acme.com;11 3030 4040\n")?;

    let options = LoadOptions {
        delimiter: b';',
        ..LoadOptions::default()
    };
    let source = load_path(&path, &options)?;
    let table = Pipeline::new().run_source(&source);

    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].phone_digits, "1130304040");
    assert!(table.records()[0].is_corporate);
    Ok(())
}

#[test]
fn test_json_file_detected_by_extension() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("prospects.json");
    fs::write(
        &path,
        r#"[
            {"company": "ACME", "email": "x@acme.com", "phone_primary": "5511987654321"},
            {"company": null, "email": "y@gmail.com"}
        ]"#,
    )?;

    let source = load_path(&path, &LoadOptions::default())?;
    assert_eq!(source.format, InputFormat::Json);

    let table = Pipeline::new().run_source(&source);
    assert_eq!(table.records()[0].area_code.as_deref(), Some("11"));
    assert_eq!(table.records()[1].company(), None);
    assert_eq!(table.records()[1].score, 0);
    Ok(())
}

#[test]
fn test_missing_company_is_rejected() -> Result<()> {
    let dir = tempdir()?;

    let csv_path = dir.path().join("no_company.csv");
    fs::write(&csv_path, "email,phone_primary\na@b.com,11987654321\n")?;
    let err = load_path(&csv_path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, EnricherError::MissingColumn(_)));

    let json_path = dir.path().join("no_company.json");
    fs::write(&json_path, r#"[{"email": "a@b.com"}]"#)?;
    let err = load_path(&json_path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, EnricherError::Validation { line: Some(1), .. }));
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_path(&dir.path().join("absent.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, EnricherError::Io(_)));
}

#[test]
fn test_cache_keyed_by_file_contents() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("prospects.csv");
    fs::write(&path, PROSPECTS_CSV)?;

    let pipeline = Pipeline::new();
    let first = pipeline.run_source(&load_path(&path, &LoadOptions::default())?);
    let again = pipeline.run_source(&load_path(&path, &LoadOptions::default())?);
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(pipeline.cache().len(), 1);

    fs::write(&path, format!("{PROSPECTS_CSV}Delta,,d@delta.com,,\n"))?;
    let changed = pipeline.run_source(&load_path(&path, &LoadOptions::default())?);
    assert!(!Arc::ptr_eq(&first, &changed));
    assert_eq!(changed.len(), 4);
    assert_eq!(pipeline.cache().len(), 2);
    Ok(())
}

#[test]
fn test_same_file_with_other_delimiter_is_not_served_from_cache() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("prospects.csv");
    fs::write(&path, "company\nACME;Beta,Gama\n")?;

    let pipeline = Pipeline::new();
    let comma = pipeline.run_source(&load_path(&path, &LoadOptions::default())?);
    let semicolon_options = LoadOptions {
        delimiter: b';',
        ..LoadOptions::default()
    };
    let semicolon_source = load_path(&path, &semicolon_options)?;
    let semicolon = pipeline.run_source(&semicolon_source);

    assert!(!Arc::ptr_eq(&comma, &semicolon));
    assert_eq!(comma.records()[0].company(), Some("ACME;Beta"));
    assert_eq!(semicolon.records()[0].company(), Some("ACME"));
    assert_eq!(pipeline.cache().len(), 2);
    Ok(())
}

#[test]
fn test_cached_table_shared_across_readers() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("prospects.csv");
    fs::write(&path, PROSPECTS_CSV)?;

    let pipeline = Pipeline::new();
    let source = load_path(&path, &LoadOptions::default())?;
    let table = pipeline.run_source(&source);

    let handles: Vec<_> = ["11", "21", "all"]
        .into_iter()
        .map(|code| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let filter = RecordFilter::new(code.parse().unwrap(), Default::default());
                table.filter(&filter).len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![1, 1, 3]);
    Ok(())
}
