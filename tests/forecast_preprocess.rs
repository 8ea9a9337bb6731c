use serde_json::{Value, json};

use atmofuzz::forecast::{ForecastStatistics, HourlySeries, preprocess_hourly};

fn day(pm2_5: Vec<Value>) -> HourlySeries {
    let time: Vec<Value> = (0..24).map(|h| json!(format!("2024-05-01T{h:02}:00"))).collect();
    let mut hourly = HourlySeries::new();
    hourly.insert("time".into(), time);
    hourly.insert("pm2_5".into(), pm2_5);
    hourly
}

fn evening_spike() -> Vec<Value> {
    (0..24)
        .map(|h| match h {
            17 => json!(45.0),
            18 => json!(200.0),
            19 => json!(60.0),
            _ => json!(10.0),
        })
        .collect()
}

#[test]
fn statistics_of_an_evening_spike() {
    let mut hourly = day(evening_spike());
    hourly.insert("sulphur_dioxide".into(), vec![json!(5.0); 24]);
    hourly.insert("nitrogen_dioxide".into(), vec![json!(10.0); 24]);
    hourly.insert("carbon_monoxide".into(), vec![json!(200.0); 24]);
    hourly.insert("ozone".into(), vec![json!(40.0); 24]);

    let stats = ForecastStatistics::from_hourly(&hourly, 24).unwrap();
    assert_eq!(stats.pm_max, 200.0);
    assert_eq!(stats.pm_peak_hour, 18);
    assert_eq!(stats.pm_hours_bad, 3.0);
    assert!((stats.pm_avg - 515.0 / 24.0).abs() < 1e-9);
    // no2 is the worst normalized gas: 10 / 600
    assert!((stats.gas_norm_risk - 100.0 * 10.0 / 600.0).abs() < 1e-9);
    assert_eq!(stats.o3_max, 40.0);
}

#[test]
fn horizon_cuts_the_series() {
    let hourly = day(evening_spike());
    let stats = ForecastStatistics::from_hourly(&hourly, 12).unwrap();
    assert_eq!(stats.pm_max, 10.0);
    assert_eq!(stats.pm_hours_bad, 0.0);
    // first maximum wins
    assert_eq!(stats.pm_peak_hour, 0);
}

#[test]
fn missing_series_contribute_zeros() {
    let hourly = day(evening_spike());
    let map = preprocess_hourly(&hourly, 24);
    assert_eq!(map["gas_norm_risk"], 0.0);
    assert_eq!(map["o3_max"], 0.0);
    assert_eq!(map["pm_peak_hour"], 18.0);
    assert_eq!(map.len(), 6);
}

#[test]
fn nulls_and_text_are_skipped() {
    let mut values = vec![Value::Null; 24];
    values[3] = json!("30");
    values[4] = json!(50.0);
    values[5] = json!("n/a");
    let stats = ForecastStatistics::from_hourly(&day(values), 24).unwrap();
    assert_eq!(stats.pm_avg, 40.0);
    assert_eq!(stats.pm_max, 50.0);
    assert_eq!(stats.pm_hours_bad, 1.0);
    assert_eq!(stats.pm_peak_hour, 4);
}

#[test]
fn all_null_pm_has_unknown_peak() {
    let stats = ForecastStatistics::from_hourly(&day(vec![Value::Null; 24]), 24).unwrap();
    assert_eq!(stats.pm_max, 0.0);
    assert_eq!(stats.pm_avg, 0.0);
    assert_eq!(stats.pm_peak_hour, -1);
}

#[test]
fn no_time_axis_means_nothing() {
    let mut hourly = HourlySeries::new();
    hourly.insert("pm2_5".into(), evening_spike());
    assert!(ForecastStatistics::from_hourly(&hourly, 24).is_none());
    assert!(preprocess_hourly(&hourly, 24).is_empty());
    hourly.insert("time".into(), Vec::new());
    assert!(preprocess_hourly(&hourly, 24).is_empty());
}

#[test]
fn peak_hour_from_other_time_formats() {
    let stamps = [("2024-05-01T07:00:00Z", 7), ("2024-05-01 21:30", 21), ("2024-05-01", 0)];
    for (stamp, hour) in stamps {
        let mut hourly = HourlySeries::new();
        hourly.insert("time".into(), vec![json!(stamp)]);
        hourly.insert("pm2_5".into(), vec![json!(12.0)]);
        let stats = ForecastStatistics::from_hourly(&hourly, 24).unwrap();
        assert_eq!(stats.pm_peak_hour, hour, "{stamp}");
    }
    let mut hourly = HourlySeries::new();
    hourly.insert("time".into(), vec![json!("yesterday")]);
    hourly.insert("pm2_5".into(), vec![json!(12.0)]);
    assert_eq!(ForecastStatistics::from_hourly(&hourly, 24).unwrap().pm_peak_hour, -1);
}
