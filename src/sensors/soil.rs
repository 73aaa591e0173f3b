//! Capacitive soil-moisture probe on ADC1.
//!
//! The probe output falls as the soil gets wetter: a 12-bit reading of
//! 4095 is bone dry (0 %) and 0 is saturated (100 %).  The conversion uses
//! integer mapping, so results are whole percentages.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH6 (GPIO34) via the oneshot API (initialised by hw_init).
//! On host/test: reads an injectable per-instance value.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

pub const ADC_MAX: u16 = 4095;

/// Map a raw reading onto 0–100 % (dry → wet).
pub fn raw_to_percent(raw: u16) -> Result<f32, SensorError> {
    if raw > ADC_MAX {
        return Err(SensorError::OutOfRange);
    }
    let percent = (u32::from(ADC_MAX - raw) * 100) / u32::from(ADC_MAX);
    Ok(percent as f32)
}

pub struct SoilMoistureSensor {
    _adc_gpio: i32,
    /// Simulated ADC channel; `None` reads as an ADC failure.
    #[cfg(not(target_os = "espidf"))]
    sim_raw: Option<u16>,
}

impl SoilMoistureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
            #[cfg(not(target_os = "espidf"))]
            sim_raw: Some(ADC_MAX / 2),
        }
    }

    /// Inject the raw value returned by subsequent reads (`None` = ADC fault).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_raw(&mut self, raw: Option<u16>) {
        self.sim_raw = raw;
    }

    pub fn read_percent(&self) -> Result<f32, SensorError> {
        let raw = self.read_adc()?;
        raw_to_percent(raw)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(hw_init::ADC1_CH_SOIL)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        self.sim_raw.ok_or(SensorError::AdcReadFailed)
    }
}
