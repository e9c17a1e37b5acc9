use amps_config::{
    DerivedValues, DriverSource, ElectricFieldModel, FieldEvaluation, FieldModel, FluxKind,
    MhdSource, OuterBoundary, OutputDomain, OutputFormat, RunConfiguration, ShueMode,
    SpeciesPreset, TemporalMode, check_config,
};
use amps_param::{ParamDocument, build_manifest, import_config, param_digest, render_param_file};
use amps_physics::SpectrumModel;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn render(cfg: &RunConfiguration) -> String {
    render_param_file(cfg, &DerivedValues::compute(cfg))
}

fn reimport(cfg: &RunConfiguration) -> RunConfiguration {
    let text = render(cfg);
    let doc = ParamDocument::parse(&text).expect("rendered file parses");
    import_config(&doc).expect("rendered file imports")
}

fn gridded_storm() -> RunConfiguration {
    let mut cfg = RunConfiguration::default();
    cfg.particle.species = SpeciesPreset::Helium;
    cfg.particle.charge = 2;
    cfg.particle.mass_amu = 4.0026;
    cfg.field.evaluation = FieldEvaluation::Gridded;
    cfg.field.model = FieldModel::T01 { g1: 8.5, g2: 14.25 };
    cfg.boundary.outer = OuterBoundary::Box {
        x_min_re: -80.0,
        x_max_re: 20.0,
        y_min_re: -40.0,
        y_max_re: 40.0,
        z_min_re: -35.5,
        z_max_re: 35.5,
    };
    cfg.boundary.inner_radius_re = 1.25;
    cfg.efield = ElectricFieldModel::VollandStern { kp: 6.3 };
    cfg.temporal = TemporalMode::Static;
    cfg.spectrum.model = SpectrumModel::Band {
        j0: 2.5e3,
        gamma_a: 1.5,
        gamma_b: 3.75,
        e0_mev: 20.0,
        e_ref_mev: 10.0,
    };
    cfg.output.domain = OutputDomain::Points {
        positions_re: vec![[6.6, 0.0, 0.0], [-4.25, 2.5, 1.125]],
    };
    cfg.output.flux_kind = FluxKind::Integral;
    cfg.output.format = OutputFormat::Csv;
    cfg.output.cutoff_rigidity = false;
    cfg
}

fn mhd_event() -> RunConfiguration {
    let mut cfg = RunConfiguration::default();
    cfg.run.contact_email = Some("ops@example.org".to_string());
    cfg.field.evaluation = FieldEvaluation::Gridded;
    cfg.field.model = FieldModel::Mhd {
        source: MhdSource::Gamera,
        run_id: "gamera_2017_09_07".to_string(),
    };
    cfg.boundary.outer = OuterBoundary::Shue {
        mode: ShueMode::Manual {
            r0_re: 9.5,
            alpha: 0.58,
        },
        x_tail_re: -45.0,
    };
    cfg.efield = ElectricFieldModel::Weimer;
    cfg.temporal = TemporalMode::TimeSeries {
        start: Utc.with_ymd_and_hms(2017, 9, 7, 12, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2017, 9, 9, 0, 30, 0).unwrap(),
        field_update_cadence_min: 2.5,
        inject_cadence_min: 15.0,
        driver_source: DriverSource::File {
            path: "drivers/omni_1min.txt".to_string(),
        },
    };
    cfg.spectrum.model = SpectrumModel::Table {
        path: "spectra/gle72.dat".to_string(),
    };
    cfg.output.domain = OutputDomain::Trajectory {
        path: "orbits/iss.csv".to_string(),
    };
    cfg
}

#[test]
fn default_config_survives_render_and_import() {
    let cfg = RunConfiguration::default();
    assert_eq!(reimport(&cfg), cfg);
}

#[test]
fn gridded_box_config_survives_render_and_import() {
    let cfg = gridded_storm();
    assert_eq!(reimport(&cfg), cfg);
}

#[test]
fn mhd_time_series_config_survives_render_and_import() {
    let cfg = mhd_event();
    assert_eq!(reimport(&cfg), cfg);
}

#[test]
fn auto_shue_values_are_informational() {
    let cfg = RunConfiguration::default();
    let text = render(&cfg);
    assert!(text.contains("SHUE_R0"));
    let back = reimport(&cfg);
    assert!(matches!(
        back.boundary.outer,
        OuterBoundary::Shue {
            mode: ShueMode::Auto,
            ..
        }
    ));
}

#[test]
fn reimport_is_a_fixed_point_of_rendering() {
    let mut cfg = gridded_storm();
    cfg.field.drivers.pdyn_npa = 3.14159;
    cfg.particle.mass_amu = 4.00260049;
    let once = render(&reimport(&cfg));
    let doc = ParamDocument::parse(&once).unwrap();
    let twice = render(&import_config(&doc).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn manifest_digest_matches_rendered_text() {
    let cfg = mhd_event();
    let text = render(&cfg);
    let manifest = build_manifest(
        &cfg,
        &DerivedValues::compute(&cfg),
        &text,
        &check_config(&cfg),
    )
    .unwrap();
    assert_eq!(manifest.param_sha256, param_digest(&text));
    assert_eq!(manifest.field_model, "MHD");
    assert_eq!(manifest.temporal, "TIME_SERIES");
}

proptest! {
    #[test]
    fn active_fields_reimport_within_declared_precision(
        dst in -600.0f64..50.0,
        pdyn in 0.1f64..50.0,
        bz in -100.0f64..100.0,
        vx in -1500.0f64..-200.0,
        w1 in 0.0f64..50.0,
        j0 in 1.0f64..1e8,
        gamma in 0.5f64..8.0,
    ) {
        let mut cfg = RunConfiguration::default();
        cfg.field.drivers.dst_nt = dst;
        cfg.field.drivers.pdyn_npa = pdyn;
        cfg.field.drivers.bz_nt = bz;
        cfg.field.drivers.vx_kmps = vx;
        if let FieldModel::Ts05 { w } = &mut cfg.field.model {
            w[0] = w1;
        }
        if let SpectrumModel::PowerLaw { j0: j, gamma: g, .. } = &mut cfg.spectrum.model {
            *j = j0;
            *g = gamma;
        }

        let back = reimport(&cfg);
        for id in cfg.active_fields() {
            let original = cfg.scalar(id).unwrap();
            let reread = back.scalar(id).unwrap();
            prop_assert!(
                id.spec().format.matches(original, reread),
                "{}: {} vs {}", id.key(), original, reread
            );
        }
    }
}
