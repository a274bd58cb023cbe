use loomlog::Level;

#[test]
fn level_ordering() {
    assert!(Level::Trace < Level::Debug);
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert!(Level::Error < Level::Fatal);
    assert!(Level::Fatal < Level::Off);
}

#[test]
fn level_display() {
    let shown: Vec<String> = Level::all().iter().map(ToString::to_string).collect();
    assert_eq!(
        shown,
        ["trace", "debug", "info", "warn", "error", "fatal", "off"]
    );
}

#[test]
fn level_from_str_accepts_both_spellings() {
    assert_eq!("trace".parse::<Level>().unwrap(), Level::Trace);
    assert_eq!("ALL".parse::<Level>().unwrap(), Level::Trace);
    assert_eq!("DEBUG".parse::<Level>().unwrap(), Level::Debug);
    assert_eq!("Info".parse::<Level>().unwrap(), Level::Info);
    assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("err".parse::<Level>().unwrap(), Level::Error);
    assert_eq!("FATAL".parse::<Level>().unwrap(), Level::Fatal);
    assert_eq!("OFF".parse::<Level>().unwrap(), Level::Off);
}

#[test]
fn level_from_str_invalid() {
    assert!("loud".parse::<Level>().is_err());
    assert!("".parse::<Level>().is_err());
}

#[test]
fn level_default() {
    assert_eq!(Level::default(), Level::Info);
}
