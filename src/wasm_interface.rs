//! WebAssembly interface for running a Hopfield network in the browser.
//!
//! The browser's animation loop plays the role of the visual-mode event
//! loop: each frame calls `step()`, repaints the returned flips, and hands
//! control back. Clicking "stop" calls `cancel()`, which takes effect before
//! the next neuron update.

use wasm_bindgen::prelude::*;

use crate::{
    BipolarVector, CancelToken, HopfieldConfig, HopfieldError, HopfieldNetwork, NetworkRun,
    RunPhase, Termination,
};

fn to_js(e: HopfieldError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-friendly wrapper around `HopfieldNetwork`.
///
/// Pixel buffers cross the boundary as `Int8Array`s of +1/-1 values, or as
/// `Uint8Array` luma values (255 = white = +1).
#[wasm_bindgen]
pub struct WasmHopfield {
    net: HopfieldNetwork,
    patterns: Vec<BipolarVector>,
    run: Option<NetworkRun>,
    cancel: CancelToken,
}

#[wasm_bindgen]
impl WasmHopfield {
    /// Create an untrained network for `width` x `height` images.
    ///
    /// # Example (JavaScript)
    /// ```javascript
    /// const net = new WasmHopfield(64, 64);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize) -> Result<WasmHopfield, JsValue> {
        // Enable panic messages in browser console
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        Ok(Self {
            net: HopfieldNetwork::with_config(HopfieldConfig::new(width, height)).map_err(to_js)?,
            patterns: Vec::new(),
            run: None,
            cancel: CancelToken::new(),
        })
    }

    /// Queue a +1/-1 training pattern.
    pub fn add_pattern(&mut self, values: Vec<i8>) -> Result<(), JsValue> {
        let pattern = BipolarVector::from_values(&values).map_err(to_js)?;
        self.patterns.push(pattern);
        Ok(())
    }

    /// Queue a training pattern given as luma values.
    pub fn add_pattern_luma(&mut self, luma: Vec<u8>) {
        self.patterns
            .push(BipolarVector::from_bools(luma.iter().map(|&l| l == 255)));
    }

    /// Train on every queued pattern.
    ///
    /// # Example (JavaScript)
    /// ```javascript
    /// for (const img of images) net.add_pattern_luma(img);
    /// net.train();
    /// ```
    pub fn train(&mut self) -> Result<(), JsValue> {
        self.run = None;
        self.net.train(&self.patterns).map_err(to_js)
    }

    /// Begin relaxing `probe` (+1/-1 values).
    pub fn start_run(&mut self, probe: Vec<i8>) -> Result<(), JsValue> {
        let probe = BipolarVector::from_values(&probe).map_err(to_js)?;
        self.cancel.reset();
        self.run = Some(self.net.start_run(&probe).map_err(to_js)?);
        Ok(())
    }

    /// Perform up to `max_updates` neuron updates.
    ///
    /// Returns the flips as a flat `[index, value, index, value, ...]`
    /// array for repainting.
    ///
    /// # Example (JavaScript)
    /// ```javascript
    /// function frame() {
    ///     const flips = net.step(25);
    ///     for (let k = 0; k < flips.length; k += 2) paint(flips[k], flips[k + 1]);
    ///     if (net.is_running()) requestAnimationFrame(frame);
    /// }
    /// ```
    pub fn step(&mut self, max_updates: usize) -> Vec<i32> {
        let mut flips = Vec::new();
        let run = match self.run.as_mut() {
            Some(run) if !run.is_finished() => run,
            _ => return flips,
        };

        for _ in 0..max_updates {
            if run.is_finished() {
                break;
            }
            if self.cancel.is_cancelled() {
                run.cancel();
                break;
            }
            let update = run.step();
            if update.flipped {
                flips.push(update.index as i32);
                flips.push(update.value as i32);
            }
        }

        if let Some(termination) = run.termination() {
            let message = match termination {
                Termination::Converged { iterations } => {
                    format!("Converged after {} iterations", iterations)
                }
                Termination::Cancelled => "Run cancelled".to_string(),
            };
            web_sys::console::log_1(&message.into());
        }
        flips
    }

    /// Request that the current run stop.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().map(|r| !r.is_finished()).unwrap_or(false)
    }

    /// "ready", "running", "converged" or "cancelled".
    pub fn status(&self) -> String {
        match self.run.as_ref().map(|r| r.phase()) {
            None | Some(RunPhase::Initialized) => "ready",
            Some(RunPhase::Running) => "running",
            Some(RunPhase::Converged) => "converged",
            Some(RunPhase::Cancelled) => "cancelled",
        }
        .to_string()
    }

    /// Completed sweeps of the current run.
    pub fn iterations(&self) -> usize {
        self.run.as_ref().map(|r| r.iterations()).unwrap_or(0)
    }

    /// Energy samples of the current run, for plotting.
    pub fn energy_trajectory(&self) -> js_sys::Float64Array {
        match self.run.as_ref() {
            Some(run) => js_sys::Float64Array::from(run.trajectory().as_slice()),
            None => js_sys::Float64Array::new_with_length(0),
        }
    }

    /// Current state as +1/-1 values.
    pub fn state(&self) -> Vec<i8> {
        self.run
            .as_ref()
            .map(|r| r.state().to_values())
            .unwrap_or_default()
    }

    /// Learned state as a JSON string.
    pub fn export_state(&self) -> Result<String, JsValue> {
        self.net
            .to_state()
            .and_then(|s| s.to_json())
            .map_err(to_js)
    }
}
