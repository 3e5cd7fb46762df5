use chrono::{Datelike, NaiveDate};
use register_core::{
    generate_schedule, round_cents, AssetInput, Clock, FixedClock, ScheduleMethod,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn inputs() -> Vec<AssetInput> {
    let cases = [
        (date(1999, 1, 1), 446.68, ScheduleMethod::StraightLine, 3),
        (date(2020, 3, 15), 15_000.0, ScheduleMethod::DecliningBalance, 5),
        (date(2021, 6, 10), 25_000.0, ScheduleMethod::StraightLine, 4),
        (date(2016, 2, 29), 1_234.56, ScheduleMethod::DecliningBalance, 2),
        (date(2010, 12, 31), 99_999.99, ScheduleMethod::DecliningBalance, 12),
        (date(2023, 7, 1), 10.0, ScheduleMethod::StraightLine, 1),
    ];
    cases
        .into_iter()
        .map(|(acquired, value, method, years)| {
            AssetInput::new(acquired, value, method, years).unwrap()
        })
        .collect()
}

fn reference_dates() -> Vec<NaiveDate> {
    vec![
        date(2000, 1, 1),
        date(2021, 6, 10),
        date(2022, 3, 29),
        date(2024, 6, 30),
        date(2060, 1, 1),
    ]
}

#[test]
fn one_row_per_year_of_useful_life() {
    for input in inputs() {
        for as_of in reference_dates() {
            let schedule = generate_schedule(&input, as_of);
            assert_eq!(schedule.len() as u32, input.useful_life_years());
            let first = input.acquisition_date().year();
            for (offset, row) in schedule.iter().enumerate() {
                assert_eq!(row.year, first + offset as i32);
            }
        }
    }
}

#[test]
fn cumulative_grows_and_net_value_never_goes_negative() {
    for input in inputs() {
        for as_of in reference_dates() {
            let schedule = generate_schedule(&input, as_of);
            let mut previous = 0.0;
            for row in &schedule {
                assert!(row.annual_depreciation >= 0.0);
                assert!(row.cumulative_depreciation + 1e-9 >= previous);
                assert!(row.net_book_value >= 0.0);
                assert!(
                    (row.cumulative_depreciation + row.net_book_value - input.original_value())
                        .abs()
                        <= 0.011,
                    "{input:?} on {as_of}: {row:?}"
                );
                previous = row.cumulative_depreciation;
            }
        }
    }
}

#[test]
fn fully_elapsed_life_depreciates_whole_value() {
    for input in inputs() {
        let schedule = generate_schedule(&input, date(2100, 1, 1));
        let last = schedule.last().unwrap();
        assert_eq!(last.cumulative_depreciation, round_cents(input.original_value()));
        assert_eq!(last.net_book_value, 0.0);
    }
}

#[test]
fn before_acquisition_nothing_is_charged() {
    for input in inputs() {
        let schedule = generate_schedule(&input, date(1990, 1, 1));
        assert!(schedule.iter().all(|row| row.annual_depreciation == 0.0));
        assert!(schedule
            .iter()
            .all(|row| row.net_book_value == round_cents(input.original_value())));
    }
}

#[test]
fn same_inputs_give_identical_schedules() {
    let clock = FixedClock::on(date(2024, 6, 30));
    for input in inputs() {
        let first = generate_schedule(&input, clock.today());
        let second = generate_schedule(&input, clock.today());
        assert_eq!(first, second);
    }
}
