use iconforge::lockfile::{Lockfile, TargetLock, LOCKFILE_NAME};

#[test]
fn missing_lockfile_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = Lockfile::load(&dir.path().join(LOCKFILE_NAME)).unwrap();
    assert_eq!(lockfile, Lockfile::default());
    assert!(lockfile.targets.is_empty());
}

#[test]
fn lockfile_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(LOCKFILE_NAME);

    let mut lockfile = Lockfile {
        version: 1,
        ..Default::default()
    };
    lockfile.targets.insert(
        "tray".to_string(),
        TargetLock {
            source_hash: "abc".to_string(),
            settings_hash: "def".to_string(),
            outputs: vec!["tray-icon.png".to_string(), "tray-icon@2x.png".to_string()],
        },
    );
    lockfile.save(&path).unwrap();

    assert_eq!(Lockfile::load(&path).unwrap(), lockfile);
}

#[test]
fn corrupt_lockfile_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(LOCKFILE_NAME);
    std::fs::write(&path, "version = \"one\"").unwrap();
    assert!(Lockfile::load(&path).is_err());
}
