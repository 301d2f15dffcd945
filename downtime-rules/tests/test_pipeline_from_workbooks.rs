use downtime_core::{Bucket, MonthKey};
use downtime_ingest::MonthExtractor;
use downtime_rules::{FileOutcome, Pipeline, PipelineOptions};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

enum V {
    S(&'static str),
    N(f64),
    Blank,
}

/// Write a workbook with the given sheets; each row starts at column A.
fn write_book(path: &Path, sheets: &[(&str, usize, Vec<Vec<V>>)]) {
    let mut wb = Workbook::new();
    for (name, first_row, rows) in sheets {
        let ws = wb.add_worksheet();
        ws.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            let r = (first_row + r) as u32;
            for (c, v) in row.iter().enumerate() {
                match v {
                    V::S(s) => {
                        ws.write_string(r, c as u16, *s).unwrap();
                    }
                    V::N(n) => {
                        ws.write_number(r, c as u16, *n).unwrap();
                    }
                    V::Blank => {}
                }
            }
        }
    }
    wb.save(path).unwrap();
}

fn scenario_a_rows() -> Vec<Vec<V>> {
    vec![
        vec![V::S("CODIGO DETENCION"), V::S("DURACION EN MINUTOS")],
        vec![V::S("Produccion"), V::N(60.0)],
        vec![V::S("1. Paradas Programadas - Mantención"), V::N(30.0)],
        vec![V::S("2. Paradas No Planificadas - Fallas y Averías"), V::N(90.0)],
    ]
}

fn pipeline() -> Pipeline {
    let extractor = MonthExtractor::new("detenciones-Llenado_V2", "xlsx").unwrap();
    Pipeline::new(extractor, PipelineOptions::default())
}

fn key(s: &str) -> MonthKey {
    MonthKey::parse(s).unwrap()
}

#[test]
fn test_scenario_a_single_month() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240105-12345678.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );

    let mut p = pipeline();
    let outcomes = p.run_dir(dir.path()).unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].1, FileOutcome::Categorized(key("202401")));

    let snap = p.snapshot();
    let jan = &snap.months[0].summary;
    assert_eq!(snap.months[0].month, key("202401"));
    assert_eq!(jan.total_hours(), 3.0);
    assert_eq!(jan.hours(Bucket::Production), 1.0);
    assert_eq!(jan.hours(Bucket::Maintenance), 0.5);
    assert_eq!(jan.hours(Bucket::Failures), 1.5);
    assert_eq!(jan.hours(Bucket::Scheduled), 0.0);
    assert_eq!(jan.hours(Bucket::Unplanned), 0.0);
    assert_eq!(jan.other_hours(), 0.0);
}

#[test]
fn test_scenario_b_header_on_row_three() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240205-12345678.xlsx"),
        &[("detalle", 3, scenario_a_rows())],
    );

    let mut p = pipeline();
    p.run_dir(dir.path()).unwrap();
    let snap = p.snapshot();
    assert_eq!(snap.months[0].summary.total_minutes, 180.0);
    assert_eq!(snap.months[0].summary.buckets.get(Bucket::Failures), 90.0);
}

#[test]
fn test_scenario_c_loose_filename() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("copia detenciones-Llenado_V2 202403.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );

    let mut p = pipeline();
    let outcomes = p.run_dir(dir.path()).unwrap();
    assert_eq!(outcomes[0].1, FileOutcome::Categorized(key("202403")));
}

#[test]
fn test_same_month_files_add_up() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240105-11111111.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240120-22222222.xlsx"),
        &[(
            "detalle",
            0,
            vec![
                vec![V::S("CODIGO DETENCION"), V::S("DURACION EN MINUTOS")],
                vec![V::S("Produccion"), V::N(30.0)],
                vec![V::S("2. Paradas No Planificadas - Micro parada"), V::N(6.0)],
            ],
        )],
    );

    let mut p = pipeline();
    p.run_dir(dir.path()).unwrap();
    let snap = p.snapshot();
    assert_eq!(snap.months.len(), 1);
    let jan = &snap.months[0];
    assert_eq!(jan.files, 2);
    assert_eq!(jan.summary.total_minutes, 216.0);
    assert_eq!(jan.summary.buckets.get(Bucket::Production), 90.0);
    // micro-stop row also counts as unplanned
    assert_eq!(jan.summary.buckets.get(Bucket::MicroStops), 6.0);
    assert_eq!(jan.summary.buckets.get(Bucket::Unplanned), 6.0);
    assert_eq!(jan.summary.other_minutes(), -6.0);
}

#[test]
fn test_annual_matches_months() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240105-11111111.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240305-33333333.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );

    let mut p = pipeline();
    p.run_dir(dir.path()).unwrap();
    let snap = p.snapshot();
    assert_eq!(snap.months.len(), 2);
    assert_eq!(snap.year(), Some(2024));
    assert_eq!(snap.annual.total_minutes, 360.0);
    for bucket in Bucket::ALL {
        let sum: f64 = snap.months.iter().map(|m| m.summary.buckets.get(bucket)).sum();
        assert_eq!(snap.annual.buckets.get(bucket), sum);
    }
}

#[test]
fn test_missing_category_column_records_total_only() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240405-12345678.xlsx"),
        &[(
            "detalle",
            0,
            vec![
                vec![V::S("CODIGO"), V::S("DURACION EN MINUTOS")],
                vec![V::S("Produccion"), V::N(40.0)],
                vec![V::S("Produccion"), V::Blank],
            ],
        )],
    );

    let mut p = pipeline();
    let outcomes = p.run_dir(dir.path()).unwrap();
    assert_eq!(outcomes[0].1, FileOutcome::TotalOnly(key("202404")));

    let snap = p.snapshot();
    let apr = &snap.months[0];
    assert_eq!(apr.total_only_files, 1);
    assert_eq!(apr.summary.total_minutes, 40.0);
    assert_eq!(apr.summary.buckets.categorized(), 0.0);
    assert!(apr.samples.is_none());
}

#[test]
fn test_fallback_sheet_gives_total_only() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240605-12345678.xlsx"),
        &[
            (
                "detalle",
                0,
                vec![
                    vec![V::S("CODIGO DETENCION"), V::S("Observaciones")],
                    vec![V::S("Produccion"), V::S("ok")],
                ],
            ),
            (
                "resumen",
                0,
                vec![vec![V::S("Minutos")], vec![V::N(12.0)], vec![V::N(8.0)]],
            ),
        ],
    );

    let mut p = pipeline();
    let outcomes = p.run_dir(dir.path()).unwrap();
    assert_eq!(outcomes[0].1, FileOutcome::TotalOnly(key("202406")));
    assert_eq!(p.snapshot().months[0].summary.total_minutes, 20.0);
}

#[test]
fn test_bad_files_are_skipped_and_run_continues() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("detenciones-Llenado_V2-20240705-12345678.xlsx"),
        b"definitely not a workbook",
    )
    .unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-sin-fecha.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240805-12345678.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240905-12345678.xlsx"),
        &[("detalle", 0, vec![vec![V::S("CODIGO DETENCION")], vec![V::S("Produccion")]])],
    );

    let mut p = pipeline();
    let outcomes = p.run_dir(dir.path()).unwrap();
    assert_eq!(outcomes.len(), 4);
    let skipped = outcomes.iter().filter(|(_, o)| *o == FileOutcome::Skipped).count();
    assert_eq!(skipped, 3);

    let snap = p.snapshot();
    assert_eq!(snap.months.len(), 1);
    assert_eq!(snap.months[0].month, key("202408"));
}

#[test]
fn test_empty_directory_yields_empty_snapshot() {
    let dir = tempdir().unwrap();
    let mut p = pipeline();
    assert!(p.run_dir(dir.path()).unwrap().is_empty());
    assert!(p.snapshot().is_empty());
}

#[test]
fn test_rerun_on_same_directory_is_identical() {
    let dir = tempdir().unwrap();
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240105-11111111.xlsx"),
        &[("detalle", 0, scenario_a_rows())],
    );
    write_book(
        &dir.path().join("detenciones-Llenado_V2-20240205-22222222.xlsx"),
        &[("detalle", 2, scenario_a_rows())],
    );

    let mut first = pipeline();
    first.run_dir(dir.path()).unwrap();
    let mut second = pipeline();
    second.run_dir(dir.path()).unwrap();
    assert_eq!(first.snapshot(), second.snapshot());
}
