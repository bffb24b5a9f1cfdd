//! Property tests for the recurrence engine, the adherence aggregator and
//! the status store.

use chrono::{Duration, NaiveDate};
use medtrack_core::{
    adherence_tier, calendar_markings, day_adherence, is_due, next_due_after, parse_date,
    AdherenceTier, Error, EventLog, Frequency, Medication, MedicationId, NextDose, StatusStore,
    TimeSlot,
};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Dates within roughly ten years either side of 2024-01-01
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (-3650i64..3650).prop_map(|offset| base_date() + Duration::days(offset))
}

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::EveryOtherDay),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        "[a-z ]{0,12}".prop_map(Frequency::Custom),
    ]
}

fn arb_slot() -> impl Strategy<Value = TimeSlot> {
    prop::sample::select(TimeSlot::PRESETS.to_vec()).prop_map(|s| TimeSlot::new(s).unwrap())
}

fn arb_medication(id: u32) -> impl Strategy<Value = Medication> {
    (
        arb_frequency(),
        prop::collection::vec(arb_slot(), 1..4),
        prop::option::of(arb_date()),
    )
        .prop_map(move |(frequency, times, first_taken)| Medication {
            id: MedicationId(id),
            name: format!("Med {}", id),
            dosage: "1 tablet".into(),
            times,
            frequency,
            first_taken,
        })
}

fn arb_medications() -> impl Strategy<Value = Vec<Medication>> {
    prop::collection::vec(arb_medication(0), 0..5).prop_map(|mut meds| {
        for (i, m) in meds.iter_mut().enumerate() {
            m.id = MedicationId(i as u32 + 1);
        }
        meds
    })
}

/// (medication id, slot, taken) triples recorded on one day
fn arb_day_entries() -> impl Strategy<Value = Vec<(u32, TimeSlot, bool)>> {
    prop::collection::vec((1u32..7, arb_slot(), any::<bool>()), 0..12)
}

fn weekly(first_taken: NaiveDate) -> Medication {
    Medication {
        id: MedicationId(1),
        name: "Aspirin".into(),
        dosage: "100mg".into(),
        times: vec![TimeSlot::new("Morning").unwrap()],
        frequency: Frequency::Weekly,
        first_taken: Some(first_taken),
    }
}

proptest! {
    #[test]
    fn daily_always_due(anchor in prop::option::of(arb_date()), date in arb_date()) {
        let med = Medication {
            id: MedicationId(1),
            name: "Vitamin D".into(),
            dosage: "1000 IU".into(),
            times: vec![TimeSlot::new("Morning").unwrap()],
            frequency: Frequency::Daily,
            first_taken: anchor,
        };
        prop_assert!(is_due(&med, date));
    }

    #[test]
    fn weekly_periodicity(anchor in arb_date(), date in arb_date()) {
        let med = weekly(anchor);
        let expected = (date - anchor).num_days() % 7 == 0;
        prop_assert_eq!(is_due(&med, date), expected);
    }

    #[test]
    fn weekly_next_dose_lands_on_due_date(anchor in arb_date(), from in arb_date()) {
        let med = weekly(anchor);
        let days = match next_due_after(&med, from) {
            NextDose::Today => 0,
            NextDose::Tomorrow => 1,
            NextDose::InDays(n) => i64::from(n),
            NextDose::On(_) => unreachable!("weekly rules report day counts"),
        };
        prop_assert!(days < 7);
        prop_assert!(is_due(&med, from + Duration::days(days)));
        // No earlier due date is skipped
        for gap in 1..days {
            prop_assert!(!is_due(&med, from + Duration::days(gap)));
        }
    }

    #[test]
    fn monthly_next_dose_is_due(anchor in arb_date(), from in arb_date()) {
        let med = Medication {
            frequency: Frequency::Monthly,
            ..weekly(anchor)
        };
        match next_due_after(&med, from) {
            NextDose::Today => prop_assert!(is_due(&med, from)),
            NextDose::On(date) => {
                prop_assert!(date > from);
                prop_assert!(is_due(&med, date));
            }
            other => prop_assert!(false, "unexpected monthly next dose {:?}", other),
        }
    }

    #[test]
    fn monthly_due_exactly_once_per_month(anchor in arb_date(), probe in arb_date()) {
        use chrono::Datelike;
        let med = Medication {
            frequency: Frequency::Monthly,
            ..weekly(anchor)
        };
        let first = NaiveDate::from_ymd_opt(probe.year(), probe.month(), 1).unwrap();
        let due_days = (0..31)
            .map(|i| first + Duration::days(i))
            .take_while(|d| d.month() == probe.month())
            .filter(|d| is_due(&med, *d))
            .count();
        prop_assert_eq!(due_days, 1);
    }

    #[test]
    fn adherence_bounds(
        meds in arb_medications(),
        entries in arb_day_entries(),
        date in arb_date(),
    ) {
        let mut log = EventLog::new();
        for (id, slot, taken) in entries {
            log.record(date, MedicationId(id), slot, taken);
        }

        let result = day_adherence(&meds, log.for_date(date), date);
        prop_assert!(result.percent <= 100);
        if result.scheduled == 0 {
            prop_assert_eq!(result.percent, 0);
            prop_assert_eq!(adherence_tier(result.percent, result.scheduled), AdherenceTier::None);
        } else {
            prop_assert_ne!(adherence_tier(result.percent, result.scheduled), AdherenceTier::None);
        }
    }

    #[test]
    fn markings_cover_log_and_selected(
        meds in arb_medications(),
        days in prop::collection::vec((arb_date(), arb_day_entries()), 0..6),
        selected in arb_date(),
    ) {
        let mut log = EventLog::new();
        for (date, entries) in &days {
            for (id, slot, taken) in entries {
                log.record(*date, MedicationId(*id), slot.clone(), *taken);
            }
        }

        let markings = calendar_markings(&meds, &log, selected);
        prop_assert!(markings.contains_key(&selected));
        prop_assert!(markings[&selected].is_selected);
        for date in log.dates() {
            prop_assert!(markings.contains_key(&date));
        }
        prop_assert_eq!(markings.values().filter(|m| m.is_selected).count(), 1);
    }

    #[test]
    fn anchor_is_first_taken_date(
        calls in prop::collection::vec((arb_date(), arb_slot(), any::<bool>()), 1..20),
    ) {
        let mut store = StatusStore::new();
        let med = store
            .add_medication("Aspirin", "100mg", vec![TimeSlot::new("Morning").unwrap()], Frequency::Weekly)
            .unwrap();

        for (date, slot, taken) in &calls {
            store.record_dose(med.id, *date, slot.clone(), *taken).unwrap();
        }

        let expected = calls.iter().find(|(_, _, taken)| *taken).map(|(date, _, _)| *date);
        prop_assert_eq!(store.medication(med.id).unwrap().first_taken, expected);
    }

    #[test]
    fn recording_twice_equals_once(
        date in arb_date(),
        slot in arb_slot(),
        taken in any::<bool>(),
    ) {
        let mut store = StatusStore::new();
        let med = store
            .add_medication("Aspirin", "100mg", vec![TimeSlot::new("Morning").unwrap()], Frequency::Daily)
            .unwrap();

        store.record_dose(med.id, date, slot.clone(), taken).unwrap();
        let once = store.clone();
        store.record_dose(med.id, date, slot, taken).unwrap();
        prop_assert_eq!(store, once);
    }
}

#[test]
fn aspirin_weekly_scenario() {
    let mut store = StatusStore::new();
    let med = store
        .add_medication(
            "Aspirin",
            "100mg",
            vec![TimeSlot::new("Morning").unwrap()],
            Frequency::from_parts("Weekly", None).unwrap(),
        )
        .unwrap();

    let med = store
        .record_dose(med.id, parse_date("2024-01-01").unwrap(), TimeSlot::new("Morning").unwrap(), true)
        .unwrap();

    assert_eq!(med.first_taken, Some(parse_date("2024-01-01").unwrap()));
    assert!(is_due(&med, parse_date("2024-01-08").unwrap()));
    assert!(!is_due(&med, parse_date("2024-01-05").unwrap()));
}

#[test]
fn empty_name_is_rejected() {
    let mut store = StatusStore::new();
    let result = store.add_medication(
        "",
        "100mg",
        vec![TimeSlot::new("Morning").unwrap()],
        Frequency::Daily,
    );
    assert!(matches!(result, Err(Error::Validation(_))));
}
