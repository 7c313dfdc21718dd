mod util;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_relative_eq;
use tempo::metron::Quantity;
use tempo::metron::units::{FootPerMinute, Knot};
use tempo::modules::{Mixer, VerticalSpeed};
use tempo::{
    Error, ManualClock, Observer, ProcessingLoop, PropertyOut, SettingsTable, Time, TimeSource,
};
use util::{AltitudeSource, Autopilot, trace_init};

fn climb() -> Vec<Option<f64>> {
    vec![Some(1000.0), Some(1010.0), Some(1020.0), None]
}

#[test]
fn test_producer_first_order() {
    trace_init();
    let clock = ManualClock::default();
    let source = AltitudeSource::new("adc", clock.shared(), climb());
    let vsi = VerticalSpeed::new("vsi", clock.shared());
    let output = vsi.vertical_speed().reader();

    let mut lp = ProcessingLoop::new(clock);
    lp.add_module(source).add_module(vsi);
    lp.connect("vsi", "/altitude", "adc", "/altitude").unwrap();
    lp.configure("vsi", "smoothing_time", "0 s").unwrap();
    lp.start().unwrap();

    lp.tick(Time::new(0.0)).unwrap();
    assert!(output.is_nil());
    lp.tick(Time::new(0.1)).unwrap();
    assert_relative_eq!(output.value().value(), 6000.0, epsilon = 1e-6);
    lp.tick(Time::new(0.2)).unwrap();
    assert_relative_eq!(output.value().value(), 6000.0, epsilon = 1e-6);
    lp.tick(Time::new(0.3)).unwrap();
    assert!(output.is_nil());
    assert_eq!(lp.ticks(), 4);
}

#[test]
fn test_consumer_first_order_lags_one_tick() {
    trace_init();
    let clock = ManualClock::default();
    let source = AltitudeSource::new("adc", clock.shared(), climb());
    let vsi = VerticalSpeed::new("vsi", clock.shared());
    let output = vsi.vertical_speed().reader();

    let mut lp = ProcessingLoop::new(clock);
    lp.add_module(vsi).add_module(source);
    lp.connect("vsi", "/altitude", "adc", "/altitude").unwrap();
    lp.configure("vsi", "smoothing_time", "0 s").unwrap();
    lp.start().unwrap();

    lp.tick(Time::new(0.0)).unwrap();
    lp.tick(Time::new(0.1)).unwrap();
    assert!(output.is_nil());
    lp.tick(Time::new(0.2)).unwrap();
    assert_relative_eq!(output.value().value(), 6000.0, epsilon = 1e-6);
}

#[test]
fn test_start_reports_all_uninitialized_settings() {
    trace_init();
    let clock = ManualClock::default();
    let mut lp = ProcessingLoop::new(clock.clone());
    lp.add_module(Autopilot::new("ap", clock.shared()))
        .add_module(Autopilot::new("at", clock.shared()));

    assert_eq!(lp.tick(Time::new(0.0)).unwrap_err(), Error::NotStarted);
    let err = lp.start().unwrap_err();
    assert_eq!(
        err,
        Error::UninitializedSettings {
            names: vec![
                "ap/gain_p".to_string(),
                "ap/gain_i".to_string(),
                "at/gain_p".to_string(),
                "at/gain_i".to_string(),
            ]
        }
    );
    assert!(!lp.is_started());
    assert!(lp.modules().all(|m| !m.io().is_verified()));

    for module in ["ap", "at"] {
        lp.configure(module, "gain_p", "1.5").unwrap();
        lp.configure(module, "gain_i", "0.1").unwrap();
    }
    lp.start().unwrap();
    assert!(lp.modules().all(|m| m.io().is_verified()));
    lp.start().unwrap();
    lp.tick(Time::new(0.0)).unwrap();
}

#[test]
fn test_speed_setting_from_text() {
    let clock = ManualClock::default();
    let ap = Autopilot::new("ap", clock.shared());
    let v_ref = ap.v_ref.clone();
    let mut lp = ProcessingLoop::new(clock);
    lp.add_module(ap);
    lp.configure("ap", "v_ref", "120 kt").unwrap();

    let speed: Quantity<Knot> = v_ref.get().unwrap();
    assert_relative_eq!(speed.base_value(), 61.73, epsilon = 0.01);
    assert_eq!(speed.to_string(), "120 kt");
    let text = lp.module("ap").unwrap().io().setting("v_ref").unwrap().to_text();
    assert_eq!(text.as_deref(), Some("120 kt"));

    assert!(matches!(
        lp.configure("ap", "v_ref", "120 ft"),
        Err(Error::Quantity(tempo::metron::Error::IncompatibleTypes { .. }))
    ));
    assert!(matches!(
        lp.configure("ap", "v_ref", "fast kt"),
        Err(Error::Quantity(tempo::metron::Error::UnparsableValue(_)))
    ));
    assert_eq!(v_ref.get().unwrap(), speed);
}

#[test]
fn test_settings_table_from_toml() {
    let clock = ManualClock::default();
    let ap = Autopilot::new("ap", clock.shared());
    let (gain_p, gain_i, v_ref) = (ap.gain_p.clone(), ap.gain_i.clone(), ap.v_ref.clone());
    let mut lp = ProcessingLoop::new(clock);
    lp.add_module(ap);

    let table: SettingsTable = toml::from_str(
        r#"
        [ap]
        gain_p = 0.5
        gain_i = 2
        v_ref = "140 kt"
        "#,
    )
    .unwrap();
    lp.apply(&table).unwrap();
    lp.start().unwrap();
    assert_eq!(gain_p.get(), Ok(0.5));
    assert_eq!(gain_i.get(), Ok(2.0));
    assert_relative_eq!(v_ref.get().unwrap().value(), 140.0);

    let bad: SettingsTable = toml::from_str("[autothrottle]\ngain = 1.0").unwrap();
    assert_eq!(
        lp.apply(&bad),
        Err(Error::UnknownModule("autothrottle".to_string()))
    );
}

#[test]
fn test_connect_errors() {
    let clock = ManualClock::default();
    let mut lp = ProcessingLoop::new(clock.clone());
    lp.add_module(AltitudeSource::new("adc", clock.shared(), climb()))
        .add_module(Mixer::<Quantity<FootPerMinute>>::new("mixer", clock.shared()));

    assert!(matches!(
        lp.connect("mixer", "/input.a", "adc", "/altitude"),
        Err(Error::PropertyTypeMismatch { .. })
    ));
    assert!(matches!(
        lp.connect("mixer", "/input.c", "adc", "/altitude"),
        Err(Error::UnknownProperty { .. })
    ));
    assert!(matches!(
        lp.connect("mixer", "/input.a", "gps", "/altitude"),
        Err(Error::UnknownModule(_))
    ));
}

#[test]
fn test_mixer_in_loop() {
    let clock = ManualClock::default();
    let mut lp = ProcessingLoop::new(clock.clone());
    let vsi = VerticalSpeed::new("vsi", clock.shared());
    let mixer = Mixer::<Quantity<FootPerMinute>>::new("mixer", clock.shared());
    let mixed = mixer.output().reader();
    lp.add_module(AltitudeSource::new("adc", clock.shared(), climb()))
        .add_module(vsi)
        .add_module(mixer);
    lp.connect("vsi", "/altitude", "adc", "/altitude").unwrap();
    lp.connect("mixer", "/input.a", "vsi", "/vertical-speed").unwrap();
    lp.configure("vsi", "smoothing_time", "0 s").unwrap();
    lp.configure("mixer", "input_a_factor", "0.5").unwrap();
    lp.start().unwrap();

    lp.run(Time::new(0.1), 2).unwrap();
    assert_relative_eq!(mixed.value().value(), 3000.0, epsilon = 1e-6);
    let text = lp.module("mixer").unwrap().io().output("/value").unwrap().to_text();
    assert_eq!(text.as_deref(), Some("3000 fpm"));
}

#[test]
fn test_observer_throttling() {
    let clock = ManualClock::default();
    let mut input = PropertyOut::<f64>::new("/input", clock.shared());
    let firings = Rc::new(RefCell::new(Vec::new()));
    let log = firings.clone();
    let mut observer = Observer::new();
    observer
        .observe(&input.reader())
        .set_minimum_dt(Time::new(0.005))
        .set_callback(move |firing| log.borrow_mut().push(firing.update_time));

    for ms in 0..=20 {
        let now = Time::new(ms as f64 / 1000.0);
        clock.set(now);
        input.write(ms as f64);
        observer.process(now);
    }
    let fired = firings.borrow().clone();
    assert!((4..=5).contains(&fired.len()), "{fired:?}");
    for pair in fired.windows(2) {
        assert!((pair[1] - pair[0]).value() >= 0.005 - 1e-9, "{fired:?}");
    }

    // a change after a quiet window fires on the next call
    let quiet = Time::new(0.1);
    observer.process(quiet);
    assert!(!observer.process(quiet + Time::new(0.007)));
    input.write(-1.0);
    assert!(observer.process(quiet + Time::new(0.0071)));
}

#[test]
fn test_run_advances_clock() {
    let clock = ManualClock::default();
    let mut lp = ProcessingLoop::new(clock.clone());
    lp.add_module(AltitudeSource::new("adc", clock.shared(), climb()));
    assert_eq!(lp.run(Time::new(0.01), 1), Err(Error::NotStarted));
    lp.start().unwrap();
    lp.run(Time::new(0.01), 10).unwrap();
    assert_eq!(lp.ticks(), 10);
    assert_relative_eq!(clock.now().value(), 0.09, epsilon = 1e-12);
}

#[test]
fn test_run_realtime() {
    trace_init();
    let clock = ManualClock::default();
    let mut lp = ProcessingLoop::new(clock.clone());
    lp.add_module(AltitudeSource::new("adc", clock.shared(), climb()));
    lp.start().unwrap();
    lp.run_realtime(Duration::from_millis(2), Some(3)).unwrap();
    assert_eq!(lp.ticks(), 3);
    assert!(clock.now().value() >= 0.0);
}
