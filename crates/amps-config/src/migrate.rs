//! Snapshot migration framework.
//!
//! Version 1 is the oldest snapshot layout still accepted.

use crate::ConfigError;
use crate::snapshot::SessionSnapshot;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut snapshot: SessionSnapshot) -> Result<SessionSnapshot, ConfigError> {
    while snapshot.version < LATEST_VERSION {
        snapshot = migrate_one_version(snapshot)?;
    }
    Ok(snapshot)
}

fn migrate_one_version(snapshot: SessionSnapshot) -> Result<SessionSnapshot, ConfigError> {
    match snapshot.version {
        1 => migrate_v1_to_v2(snapshot),
        v => Err(ConfigError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 1 kept the E-field selection even for gridless runs; the
/// backend ignores it there, so version 2 stores it as `None`.
fn migrate_v1_to_v2(mut snapshot: SessionSnapshot) -> Result<SessionSnapshot, ConfigError> {
    use crate::schema::{ElectricFieldModel, FieldEvaluation};

    if snapshot.config.field.evaluation == FieldEvaluation::Gridless {
        snapshot.config.efield = ElectricFieldModel::None;
    }
    snapshot.version = 2;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ElectricFieldModel, FieldEvaluation, RunConfiguration};

    #[test]
    fn migrate_latest_is_noop() {
        let snapshot = SessionSnapshot::new(RunConfiguration::default());
        let migrated = migrate_to_latest(snapshot.clone()).unwrap();
        assert_eq!(migrated, snapshot);
    }

    #[test]
    fn migrate_drops_gridless_efield() {
        let mut config = RunConfiguration::default();
        config.efield = ElectricFieldModel::Corotation;
        let mut snapshot = SessionSnapshot::new(config);
        snapshot.version = 1;

        let migrated = migrate_to_latest(snapshot).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.config.efield, ElectricFieldModel::None);
    }

    #[test]
    fn migrate_keeps_gridded_efield() {
        let mut config = RunConfiguration::default();
        config.field.evaluation = FieldEvaluation::Gridded;
        config.efield = ElectricFieldModel::Weimer;
        let mut snapshot = SessionSnapshot::new(config);
        snapshot.version = 1;

        let migrated = migrate_to_latest(snapshot).unwrap();
        assert_eq!(migrated.config.efield, ElectricFieldModel::Weimer);
    }

    #[test]
    fn version_zero_has_no_migration_path() {
        let mut snapshot = SessionSnapshot::new(RunConfiguration::default());
        snapshot.version = 0;
        let err = migrate_to_latest(snapshot).unwrap_err();
        assert!(matches!(err, ConfigError::Migration { .. }));
    }
}
