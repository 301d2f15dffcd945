//! Deterministic rules mapping a `CODIGO DETENCION` label to downtime buckets.
//!
//! Rules run top-down on the lower-cased label. A rule fires when all of its
//! patterns match and none of the buckets it excludes has fired already.
//! Failures are carved out of unplanned stops and maintenance out of
//! scheduled stops; nothing else is exclusive, so one row can land in
//! several buckets (a micro-stop coded under unplanned stops counts in both).

use downtime_core::{Bucket, BucketSet};

enum Pattern {
    /// Whole label equals one of these.
    Equals(&'static [&'static str]),
    /// Label contains one of these.
    Contains(&'static [&'static str]),
}

impl Pattern {
    fn matches(&self, label: &str) -> bool {
        match self {
            Pattern::Equals(options) => options.contains(&label),
            Pattern::Contains(options) => options.iter().any(|o| label.contains(o)),
        }
    }
}

struct Rule {
    bucket: Bucket,
    when: &'static [Pattern],
    unless: &'static [Bucket],
}

const UNPLANNED_STOP: Pattern = Pattern::Contains(&["2. paradas no planificadas"]);
const SCHEDULED_STOP: Pattern = Pattern::Contains(&["1. paradas programadas"]);

const RULES: &[Rule] = &[
    Rule {
        bucket: Bucket::Production,
        when: &[Pattern::Equals(&["produccion", "producción"])],
        unless: &[],
    },
    Rule {
        bucket: Bucket::MicroStops,
        when: &[Pattern::Contains(&["micro parada"])],
        unless: &[],
    },
    Rule {
        bucket: Bucket::Failures,
        when: &[
            UNPLANNED_STOP,
            Pattern::Contains(&["fallas y averias", "fallas y averías"]),
        ],
        unless: &[],
    },
    Rule {
        bucket: Bucket::Unplanned,
        when: &[UNPLANNED_STOP],
        unless: &[Bucket::Failures],
    },
    Rule {
        bucket: Bucket::Maintenance,
        when: &[SCHEDULED_STOP, Pattern::Contains(&["mantención", "mantencion"])],
        unless: &[],
    },
    Rule {
        bucket: Bucket::Scheduled,
        when: &[SCHEDULED_STOP],
        unless: &[Bucket::Maintenance],
    },
];

/// Buckets fired by a label. Missing labels fire nothing.
pub fn classify(label: Option<&str>) -> BucketSet {
    let mut fired = BucketSet::default();
    let Some(label) = label else {
        return fired;
    };
    let label = label.to_lowercase();

    for rule in RULES {
        if rule.unless.iter().any(|b| fired.contains(*b)) {
            continue;
        }
        if rule.when.iter().all(|p| p.matches(&label)) {
            fired.insert(rule.bucket);
        }
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(label: &str) -> Vec<Bucket> {
        classify(Some(label)).iter().collect()
    }

    #[test]
    fn test_production_is_exact_match() {
        assert_eq!(only("Produccion"), vec![Bucket::Production]);
        assert_eq!(only("PRODUCCIÓN"), vec![Bucket::Production]);
        assert!(only("Produccion lenta").is_empty());
    }

    #[test]
    fn test_failures_carved_out_of_unplanned() {
        assert_eq!(
            only("2. Paradas No Planificadas - Fallas y Averías"),
            vec![Bucket::Failures]
        );
        assert_eq!(
            only("2. PARADAS NO PLANIFICADAS - FALLAS Y AVERIAS"),
            vec![Bucket::Failures]
        );
        assert_eq!(
            only("2. Paradas no planificadas - Falta de material"),
            vec![Bucket::Unplanned]
        );
    }

    #[test]
    fn test_failures_need_unplanned_prefix() {
        assert!(only("Fallas y averías").is_empty());
    }

    #[test]
    fn test_maintenance_carved_out_of_scheduled() {
        assert_eq!(
            only("1. Paradas Programadas - Mantención"),
            vec![Bucket::Maintenance]
        );
        assert_eq!(
            only("1. paradas programadas - mantencion preventiva"),
            vec![Bucket::Maintenance]
        );
        assert_eq!(
            only("1. Paradas Programadas - Cambio de formato"),
            vec![Bucket::Scheduled]
        );
    }

    #[test]
    fn test_exclusive_pairs_never_both_fire() {
        let labels = [
            "2. Paradas No Planificadas - Fallas y Averías",
            "2. Paradas No Planificadas - Otros",
            "1. Paradas Programadas - Mantención",
            "1. Paradas Programadas - Aseo",
            "1. paradas programadas 2. paradas no planificadas fallas y averias mantencion",
        ];
        for label in labels {
            let set = classify(Some(label));
            assert!(!(set.contains(Bucket::Failures) && set.contains(Bucket::Unplanned)), "{label}");
            assert!(!(set.contains(Bucket::Maintenance) && set.contains(Bucket::Scheduled)), "{label}");
        }
    }

    // Micro-stops are not exclusive with anything; the overlap is kept and
    // shows up as a negative "other".
    #[test]
    fn test_micro_stop_overlaps_unplanned() {
        assert_eq!(
            only("2. Paradas No Planificadas - Micro parada"),
            vec![Bucket::MicroStops, Bucket::Unplanned]
        );
        assert_eq!(only("Micro Parada"), vec![Bucket::MicroStops]);
    }

    #[test]
    fn test_missing_or_unknown_label() {
        assert!(classify(None).is_empty());
        assert!(classify(Some("Colación")).is_empty());
    }
}
