//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite measures:
//! - A single pay period with no history
//! - A pay period replaying a year of history (26 biweekly records)
//! - Year-to-date aggregation alone over growing histories
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::calculation::{PayrollEngine, PayrollInput, calculate_employee_ytd};
use payroll_engine::config::{RateOverrides, StatutoryRateTable};
use payroll_engine::models::{
    EarningsLine, EmployeeRef, PayFrequency, PayPeriodConfig, PayType, PayrollRecord, VacationMode,
};

fn create_engine() -> PayrollEngine {
    PayrollEngine::new(StatutoryRateTable::canada_2025()).expect("Invalid rate table")
}

/// Creates an input for the pay date `period` biweekly periods into 2025.
fn create_input(period: i64, history: Vec<PayrollRecord>) -> PayrollInput {
    PayrollInput {
        employee: EmployeeRef::by_name("Jane Doe"),
        pay_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
            + chrono::Duration::days(14 * period),
        pay_period: PayPeriodConfig {
            frequency: PayFrequency::Biweekly,
            pay_type: PayType::Hourly,
            vacation_mode: VacationMode::Accrue,
            vacation_rate: Decimal::new(4, 0),
            federal_basic_personal_amount: None,
            provincial_basic_personal_amount: None,
            vacation_pay_override: None,
        },
        earnings_lines: vec![
            EarningsLine::hourly("REG", "Regular", Decimal::new(4250, 2), Decimal::new(80, 0)),
            EarningsLine::hourly("OT", "Overtime", Decimal::new(6375, 2), Decimal::new(6, 0)),
        ],
        history,
        prior_ytd: None,
        rate_overrides: RateOverrides::default(),
    }
}

/// Builds `periods` records of history by running the engine period by period.
fn create_history(engine: &PayrollEngine, periods: i64) -> Vec<PayrollRecord> {
    let mut history = Vec::new();
    for period in 0..periods {
        let result = engine
            .calculate(&create_input(period, history.clone()))
            .expect("Calculation failed");
        history.push(PayrollRecord::from_result(&result).expect("Result not serializable"));
    }
    history
}

fn bench_single_period(c: &mut Criterion) {
    let engine = create_engine();
    let input = create_input(0, Vec::new());

    c.bench_function("single_period_no_history", |b| {
        b.iter(|| engine.calculate(black_box(&input)).unwrap())
    });
}

fn bench_year_of_history(c: &mut Criterion) {
    let engine = create_engine();
    let history = create_history(&engine, 25);
    let input = create_input(25, history);

    c.bench_function("final_period_with_year_of_history", |b| {
        b.iter(|| engine.calculate(black_box(&input)).unwrap())
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let engine = create_engine();
    let employee = EmployeeRef::by_name("Jane Doe");
    let mut group = c.benchmark_group("ytd_aggregation");

    for periods in [1i64, 13, 26] {
        let history = create_history(&engine, periods);
        group.throughput(Throughput::Elements(periods as u64));
        group.bench_with_input(BenchmarkId::from_parameter(periods), &history, |b, history| {
            b.iter(|| calculate_employee_ytd(black_box(&employee), black_box(history), 2025))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_period,
    bench_year_of_history,
    bench_aggregation
);
criterion_main!(benches);
