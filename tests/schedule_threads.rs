use std::{sync::Arc, thread};

use chrono::NaiveDate;
use register_core::{AssetService, RegisterService, ScheduleEntry};

#[test]
fn schedules_are_identical_across_threads() {
    let mut register = RegisterService::create("Shared");
    RegisterService::seed_sample(&mut register);
    let register = Arc::new(register);
    let as_of = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();

    let expected: Vec<Vec<ScheduleEntry>> = ["215400", "218200"]
        .iter()
        .map(|code| AssetService::schedule(&register, code, as_of).unwrap())
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let register = Arc::clone(&register);
            thread::spawn(move || {
                ["215400", "218200"]
                    .iter()
                    .map(|code| AssetService::schedule(&register, code, as_of).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
