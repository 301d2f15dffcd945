//! Text and JSON rendering of an aggregated snapshot.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use downtime_core::{Bucket, MonthKey, MonthlyRecord, Samples, Snapshot, Summary};

const SEPARATOR_WIDTH: usize = 50;
const OTHER_LABEL: &str = "Otras";

/// Human-readable report: one block per month, then the annual roll-up.
pub fn render_text(snapshot: &Snapshot, sample_size: usize) -> Result<String> {
    let mut out = String::new();
    writeln!(out)?;
    writeln!(out, "=== RESUMEN DE DETENCIONES POR MES ===")?;
    writeln!(out, "Nota: Todos los valores están en horas")?;
    writeln!(out)?;

    for record in &snapshot.months {
        write_month(&mut out, record, sample_size)?;
    }

    let year = snapshot
        .year()
        .map(|y| y.to_string())
        .unwrap_or_default();
    writeln!(out)?;
    writeln!(out, "=== RESUMEN ANUAL {year} ===")?;
    write_totals(&mut out, &snapshot.annual, "Total horas año")?;
    Ok(out)
}

fn write_month(out: &mut String, record: &MonthlyRecord, sample_size: usize) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}:", record.month.label())?;
    write_totals(out, &record.summary, "Total horas del mes")?;

    if record.total_only_files > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "Nota: {} de {} archivo(s) sin desglose por categoría",
            record.total_only_files, record.files
        )?;
    }

    if let Some(samples) = &record.samples {
        write_samples(out, samples, sample_size)?;
    }

    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    Ok(())
}

fn write_totals(out: &mut String, summary: &Summary, total_label: &str) -> Result<()> {
    writeln!(
        out,
        "{total_label}: {:.2} ({:.0} minutos)",
        summary.total_hours(),
        summary.total_minutes
    )?;

    writeln!(out)?;
    writeln!(out, "Horas por categoría:")?;
    for bucket in Bucket::ALL {
        writeln!(
            out,
            "  {}: {:.2} ({:.0} minutos)",
            bucket.label(),
            summary.hours(bucket),
            summary.buckets.get(bucket)
        )?;
    }
    writeln!(
        out,
        "  {OTHER_LABEL}: {:.2} ({:.0} minutos)",
        summary.other_hours(),
        summary.other_minutes()
    )?;

    writeln!(out)?;
    writeln!(out, "Porcentajes por categoría:")?;
    for bucket in Bucket::ALL {
        writeln!(out, "  {}: {}", bucket.label(), percent(summary.percentage(bucket)))?;
    }
    writeln!(out, "  {OTHER_LABEL}: {}", percent(summary.other_percentage()))?;
    Ok(())
}

fn write_samples(out: &mut String, samples: &Samples, sample_size: usize) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Primeros {sample_size} valores de cada categoría (en minutos):")?;
    writeln!(out, "  Total: {}", list(&samples.total))?;
    for bucket in Bucket::ALL {
        let values = samples.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[]);
        writeln!(out, "  {}: {}", bucket.label(), list(values))?;
    }
    Ok(())
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(p) => format!("{p:.2}%"),
        None => "N/A".to_string(),
    }
}

fn list(values: &[String]) -> String {
    format!("[{}]", values.join(", "))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    year: Option<i32>,
    months: Vec<JsonBlock<'a>>,
    annual: JsonBlock<'a>,
}

#[derive(Serialize)]
struct JsonBlock<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<MonthKey>,
    label: String,
    total_hours: f64,
    hours: BTreeMap<&'static str, f64>,
    percentages: BTreeMap<&'static str, Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_only_files: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    samples: Option<&'a Samples>,
}

impl<'a> JsonBlock<'a> {
    fn from_summary(label: String, summary: &Summary) -> Self {
        let mut hours = BTreeMap::new();
        let mut percentages = BTreeMap::new();
        for bucket in Bucket::ALL {
            hours.insert(bucket.key(), summary.hours(bucket));
            percentages.insert(bucket.key(), summary.percentage(bucket));
        }
        hours.insert("other", summary.other_hours());
        percentages.insert("other", summary.other_percentage());

        Self {
            month: None,
            label,
            total_hours: summary.total_hours(),
            hours,
            percentages,
            files: None,
            total_only_files: None,
            samples: None,
        }
    }

    fn from_record(record: &'a MonthlyRecord) -> Self {
        Self {
            month: Some(record.month),
            files: Some(record.files),
            total_only_files: Some(record.total_only_files),
            samples: record.samples.as_ref(),
            ..Self::from_summary(record.month.label(), &record.summary)
        }
    }
}

/// Same content as the text report, as pretty JSON with derived fields.
pub fn render_json(snapshot: &Snapshot) -> Result<String> {
    let year = snapshot.year();
    let report = JsonReport {
        year,
        months: snapshot.months.iter().map(JsonBlock::from_record).collect(),
        annual: JsonBlock::from_summary(
            year.map(|y| format!("Resumen anual {y}")).unwrap_or_default(),
            &snapshot.annual,
        ),
    };
    let mut s = serde_json::to_string_pretty(&report)?;
    s.push('\n');
    Ok(s)
}
