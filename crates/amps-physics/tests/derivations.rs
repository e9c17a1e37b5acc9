//! Cross-module checks of the wizard's derived quantities.

use amps_physics::{
    IonSpecies, SpectrumModel, boundary_curve, dynamic_pressure_npa, flux_curve,
    reference_rigidity_gv, shue_params,
};

#[test]
fn heavier_ions_are_stiffer_per_charge() {
    let proton = reference_rigidity_gv(1, 1.0073).unwrap();
    let helium = reference_rigidity_gv(2, 4.0026).unwrap();
    let oxygen = reference_rigidity_gv(8, 15.999).unwrap();
    assert!(helium > proton);
    assert!((oxygen - helium).abs() < 0.02);
}

#[test]
fn plasma_pressure_feeds_shue() {
    let pdyn = dynamic_pressure_npa(8.0, -650.0);
    let compressed = shue_params(-10.0, pdyn);
    let quiet = shue_params(0.0, 2.0);
    assert!(compressed.r0_re < quiet.r0_re);
    assert!(compressed.alpha > quiet.alpha);
}

#[test]
fn boundary_flares_tailward() {
    let p = shue_params(-10.0, 3.5);
    let pts = boundary_curve(p, 150.0, 31).unwrap();
    let rho_max = pts.iter().map(|&(_, rho)| rho).fold(0.0, f64::max);
    assert!(rho_max > p.r0_re);
}

#[test]
fn force_field_curve_peaks_inside_range() {
    let m = SpectrumModel::ForceField { phi_mv: 600.0 };
    let pts = flux_curve(&m, IonSpecies::new(1, 1.0073), 10.0, 1e5, 40).unwrap();
    let (i_max, _) = pts
        .iter()
        .enumerate()
        .fold((0, 0.0), |acc, (i, &(_, j))| if j > acc.1 { (i, j) } else { acc });
    assert!(i_max > 0 && i_max < pts.len() - 1);
}
