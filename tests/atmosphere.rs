use natops_perf::atmosphere::{RHO0_KG_M3, TROPOPAUSE_M, TROPOPAUSE_T_K, atmosphere};
use natops_perf::units::{kt_to_ms, m_to_ft, ms_to_kt};

#[test]
fn sea_level_matches_standard_values() {
    let sl = atmosphere(0.0);
    assert!((sl.temperature_k - 288.15).abs() < 1e-9);
    assert!((sl.pressure_pa - 101_325.0).abs() < 1e-6);
    assert!((sl.density_kg_m3 - 1.225).abs() < 1e-3);
    assert!((sl.speed_of_sound_m_s - 340.29).abs() < 0.05);
    assert!((sl.density_ratio() - 1.0).abs() < 1e-12);
    assert!((RHO0_KG_M3 - 1.225).abs() < 1e-3);
}

#[test]
fn tropopause_is_continuous() {
    let boundary_ft = m_to_ft(TROPOPAUSE_M);
    let below = atmosphere(boundary_ft - 1e-6);
    let at = atmosphere(boundary_ft);
    assert!((at.temperature_k - TROPOPAUSE_T_K).abs() < 1e-6);
    assert!((below.temperature_k - at.temperature_k).abs() < 1e-6);
    assert!((below.pressure_pa - at.pressure_pa).abs() / at.pressure_pa < 1e-6);
    assert!((at.pressure_pa - 22_632.0).abs() < 5.0);
}

#[test]
fn isothermal_layer_holds_temperature_and_thins_out() {
    let low = atmosphere(40_000.0);
    let high = atmosphere(50_000.0);
    assert!((low.temperature_k - TROPOPAUSE_T_K).abs() < 1e-9);
    assert!((high.temperature_k - TROPOPAUSE_T_K).abs() < 1e-9);
    assert!(high.pressure_pa < low.pressure_pa);
    assert!((low.speed_of_sound_m_s - high.speed_of_sound_m_s).abs() < 1e-9);
}

#[test]
fn negative_altitude_uses_troposphere_law() {
    let below = atmosphere(-1_000.0);
    let sl = atmosphere(0.0);
    assert!(below.temperature_k > sl.temperature_k);
    assert!(below.pressure_pa > sl.pressure_pa);
    assert!(below.density_kg_m3 > sl.density_kg_m3);
}

#[test]
fn true_airspeed_scales_with_mach() {
    let sl = atmosphere(0.0);
    let tas = sl.true_airspeed(0.5);
    assert!((tas - 0.5 * sl.speed_of_sound_m_s).abs() < 1e-12);
    let density_drop = atmosphere(10_000.0).density_ratio();
    assert!(density_drop > 0.7 && density_drop < 0.76);
}

#[test]
fn ratios_are_relative_to_sea_level() {
    let sl = atmosphere(0.0);
    assert!((sl.temperature_ratio() - 1.0).abs() < 1e-12);
    assert!((sl.pressure_ratio() - 1.0).abs() < 1e-12);

    let tropopause = atmosphere(m_to_ft(TROPOPAUSE_M));
    assert!((tropopause.temperature_ratio() - 216.65 / 288.15).abs() < 1e-6);
    assert!((tropopause.pressure_ratio() - 0.2234).abs() < 1e-3);
    let sigma = tropopause.pressure_ratio() / tropopause.temperature_ratio();
    assert!((tropopause.density_ratio() - sigma).abs() < 1e-9);
}

#[test]
fn knots_convert_to_metres_per_second() {
    assert!((kt_to_ms(100.0) - 51.4444).abs() < 1e-3);
    assert!((ms_to_kt(340.29) - 661.5).abs() < 0.1);
    assert!((ms_to_kt(kt_to_ms(150.0)) - 150.0).abs() < 1e-9);
}
