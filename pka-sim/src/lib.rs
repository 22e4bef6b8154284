//! Register-level software model of the PKA.
//!
//! [`SimPka`] implements [`PkaPeripheral`] on the host so the driver can be
//! exercised without silicon.
//!
//! The model keeps the accelerator RAM, the control and status registers, and
//! a tick counter.
//! Every status register read, every `wait_for_interrupt`, and every
//! [`SimPka::step`] advances the clock by one tick.
//! An operation completes after its latency in ticks has elapsed.
//!
//! Interrupts are level triggered: while an enabled flag is set the model
//! calls [`PkaPeripheral::service_interrupt`], the same adapter used by the
//! real interrupt handler.
//!
//! Cloning a [`SimPka`] yields a second handle to the same peripheral, which is
//! how tests play the role of interrupt context.

use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stm32l4_hal_pka::{
    Fault,
    layout::{
        RAM_END, RAM_NUM_DW, RAM_OFFSET, ecc_scalar_mul, ecdsa_sign, ecdsa_verify, mod_exp,
        montgomery, point_check, rsa_crt,
    },
    periph::{Completion, PkaPeripheral, Status, clrfr, cr, sr},
};

mod arith;

use arith::{Curve, Point};

// operation codes understood by the model
const MODE_MONTGOMERY_EXP: u8 = 0b000000;
const MODE_MONTGOMERY: u8 = 0b000001;
const MODE_MONTGOMERY_ECC: u8 = 0b100000;
const MODE_ECDSA_SIGN: u8 = 0b100100;
const MODE_ECDSA_VERIFY: u8 = 0b100110;
const MODE_POINT_CHECK: u8 = 0b101000;
const MODE_RSA_CRT: u8 = 0b000111;

const FLAGS: u32 = sr::PROCENDF | sr::RAMERRF | sr::ADDRERRF;

#[derive(Debug)]
struct Regs {
    cr: u32,
    sr: u32,
    ram: Vec<u32>,
    latency: u32,
    remaining: u32,
    mode: u8,
    injected: Option<Fault>,
    in_isr: bool,
    starts: usize,
    irqs: usize,
}

impl Regs {
    fn new() -> Regs {
        Regs {
            cr: cr::EN,
            sr: 0,
            ram: vec![0; RAM_NUM_DW],
            latency: 0,
            remaining: 0,
            mode: 0,
            injected: None,
            in_isr: false,
            starts: 0,
            irqs: 0,
        }
    }

    fn busy(&self) -> bool {
        self.sr & sr::BUSY != 0
    }

    fn irq_line(&self) -> bool {
        (self.cr & cr::PROCENDIE != 0 && self.sr & sr::PROCENDF != 0)
            || (self.cr & cr::RAMERRIE != 0 && self.sr & sr::RAMERRF != 0)
            || (self.cr & cr::ADDRERRIE != 0 && self.sr & sr::ADDRERRF != 0)
    }

    fn ram_idx(offset: usize) -> Option<usize> {
        if offset % 4 == 0 && (RAM_OFFSET..RAM_END).contains(&offset) {
            Some((offset - RAM_OFFSET) / 4)
        } else {
            None
        }
    }

    /// AHB access to the RAM.
    fn access(&mut self, offset: usize) -> Option<usize> {
        if self.busy() {
            self.abort(sr::RAMERRF);
            None
        } else if let Some(idx) = Self::ram_idx(offset) {
            Some(idx)
        } else {
            self.sr |= sr::ADDRERRF;
            None
        }
    }

    fn abort(&mut self, flag: u32) {
        self.sr = (self.sr & !sr::BUSY) | flag;
    }

    fn start(&mut self, mode: u8) {
        self.mode = mode;
        self.remaining = self.latency;
        self.starts += 1;
        self.sr |= sr::BUSY;
    }

    fn tick(&mut self) {
        if !self.busy() {
            return;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return;
        }
        let outcome: Result<(), Fault> = match self.injected.take() {
            Some(fault) => Err(fault),
            None => self.compute(),
        };
        match outcome {
            Ok(()) => self.sr = (self.sr & !sr::BUSY) | sr::PROCENDF,
            Err(Fault::Ram) => self.abort(sr::RAMERRF),
            Err(Fault::Address) => self.abort(sr::ADDRERRF),
        }
    }

    fn word(&self, offset: usize) -> u32 {
        Self::ram_idx(offset).map_or(0, |idx| self.ram[idx])
    }

    fn words(bits: u32) -> usize {
        (bits as usize).div_ceil(32)
    }

    fn uint(&self, offset: usize, words: usize) -> Result<BigUint, Fault> {
        let start: usize = Self::ram_idx(offset).ok_or(Fault::Address)?;
        let digits: &[u32] = self.ram.get(start..start + words).ok_or(Fault::Address)?;
        Ok(BigUint::from_slice(digits))
    }

    fn store(&mut self, offset: usize, words: usize, value: &BigUint) -> Result<(), Fault> {
        let start: usize = Self::ram_idx(offset).ok_or(Fault::Address)?;
        let slot: &mut [u32] = self
            .ram
            .get_mut(start..=start + words)
            .ok_or(Fault::Address)?;
        slot.fill(0);
        value
            .to_u32_digits()
            .iter()
            .take(words)
            .enumerate()
            .for_each(|(idx, &dw)| slot[idx] = dw);
        Ok(())
    }

    fn store_word(&mut self, offset: usize, word: u32) -> Result<(), Fault> {
        let idx: usize = Self::ram_idx(offset).ok_or(Fault::Address)?;
        self.ram[idx] = word;
        Ok(())
    }

    fn nonzero(value: BigUint) -> Result<BigUint, Fault> {
        if value.is_zero() {
            Err(Fault::Address)
        } else {
            Ok(value)
        }
    }

    fn compute(&mut self) -> Result<(), Fault> {
        match self.mode {
            MODE_MONTGOMERY_EXP => self.mod_exp(),
            MODE_MONTGOMERY => self.montgomery(),
            MODE_RSA_CRT => self.rsa_crt(),
            MODE_MONTGOMERY_ECC => self.ecc_scalar_mul(),
            MODE_POINT_CHECK => self.point_check(),
            MODE_ECDSA_SIGN => self.ecdsa_sign(),
            MODE_ECDSA_VERIFY => self.ecdsa_verify(),
            _ => Err(Fault::Address),
        }
    }

    fn mod_exp(&mut self) -> Result<(), Fault> {
        let exp_words: usize = Self::words(self.word(mod_exp::IN_EXP_NB_BITS));
        let op_words: usize = Self::words(self.word(mod_exp::IN_OP_NB_BITS));
        let m: BigUint = Self::nonzero(self.uint(mod_exp::IN_MODULUS, op_words)?)?;
        let e: BigUint = self.uint(mod_exp::IN_EXPONENT, exp_words)?;
        let base: BigUint = self.uint(mod_exp::IN_EXPONENT_BASE, op_words)?;
        self.store(mod_exp::OUT_RESULT, op_words, &base.modpow(&e, &m))
    }

    fn montgomery(&mut self) -> Result<(), Fault> {
        let words: usize = Self::words(self.word(montgomery::IN_MOD_NB_BITS));
        let m: BigUint = Self::nonzero(self.uint(montgomery::IN_MODULUS, words)?)?;
        let r2: BigUint = arith::montgomery_param(&m, words);
        self.store(montgomery::OUT_PARAMETER, words, &r2)
    }

    fn rsa_crt(&mut self) -> Result<(), Fault> {
        let op_words: usize = Self::words(self.word(rsa_crt::IN_MOD_NB_BITS));
        let half: usize = op_words.div_ceil(2);
        let p: BigUint = Self::nonzero(self.uint(rsa_crt::IN_PRIME_P, half)?)?;
        let q: BigUint = Self::nonzero(self.uint(rsa_crt::IN_PRIME_Q, half)?)?;
        let dp: BigUint = self.uint(rsa_crt::IN_DP_CRT, half)?;
        let dq: BigUint = self.uint(rsa_crt::IN_DQ_CRT, half)?;
        let qinv: BigUint = self.uint(rsa_crt::IN_QINV_CRT, half)?;
        let base: BigUint = self.uint(rsa_crt::IN_EXPONENT_BASE, op_words)?;
        let result: BigUint = arith::crt_exp(&base, &p, &q, &dp, &dq, &qinv);
        self.store(rsa_crt::OUT_RESULT, op_words, &result)
    }

    fn curve(&self, mod_bits: usize, sign: usize, a: usize, p: usize) -> Result<(Curve, usize), Fault> {
        let words: usize = Self::words(self.word(mod_bits));
        let p: BigUint = Self::nonzero(self.uint(p, words)?)?;
        let a: BigUint = self.uint(a, words)?;
        Ok((Curve::new(p, a, self.word(sign) != 0), words))
    }

    fn point(&self, x: usize, y: usize, words: usize) -> Result<Point, Fault> {
        Ok(Some((self.uint(x, words)?, self.uint(y, words)?)))
    }

    fn ecc_scalar_mul(&mut self) -> Result<(), Fault> {
        use ecc_scalar_mul::*;

        let (curve, words) = self.curve(IN_OP_NB_BITS, IN_A_COEFF_SIGN, IN_A_COEFF, IN_MOD_GF)?;
        let k_words: usize = Self::words(self.word(IN_EXP_NB_BITS));
        let k: BigUint = self.uint(IN_K, k_words)?;
        let pt: Point = self.point(IN_INITIAL_POINT_X, IN_INITIAL_POINT_Y, words)?;
        let (x, y) = curve.mul(&k, &pt).unwrap_or_default();
        self.store(OUT_RESULT_X, words, &x)?;
        self.store(OUT_RESULT_Y, words, &y)
    }

    fn point_check(&mut self) -> Result<(), Fault> {
        use point_check::*;

        let (curve, words) = self.curve(IN_MOD_NB_BITS, IN_A_COEFF_SIGN, IN_A_COEFF, IN_MOD_GF)?;
        let b: BigUint = self.uint(IN_B_COEFF, words)?;
        let x: BigUint = self.uint(IN_INITIAL_POINT_X, words)?;
        let y: BigUint = self.uint(IN_INITIAL_POINT_Y, words)?;
        let r2: BigUint = self.uint(IN_MONTGOMERY_PARAM, words)?;
        let on_curve: bool =
            r2 == arith::montgomery_param(&curve.p, words) && curve.contains(&x, &y, &b);
        self.store_word(OUT_ERROR, u32::from(!on_curve))
    }

    fn ecdsa_sign(&mut self) -> Result<(), Fault> {
        use ecdsa_sign::*;

        let (curve, words) = self.curve(IN_MOD_NB_BITS, IN_A_COEFF_SIGN, IN_A_COEFF, IN_MOD_GF)?;
        let n_words: usize = Self::words(self.word(IN_ORDER_NB_BITS));
        let n: BigUint = Self::nonzero(self.uint(IN_ORDER_N, n_words)?)?;
        let g: Point = self.point(IN_INITIAL_POINT_X, IN_INITIAL_POINT_Y, words)?;
        let k: BigUint = self.uint(IN_K, n_words)?;
        let z: BigUint = self.uint(IN_HASH_E, n_words)?;
        let d: BigUint = self.uint(IN_PRIVATE_KEY_D, n_words)?;
        match arith::ecdsa_sign(&curve, &g, &n, &d, &k, &z) {
            Ok((r, s)) => {
                self.store(OUT_SIGNATURE_R, n_words, &r)?;
                self.store(OUT_SIGNATURE_S, n_words, &s)?;
                self.store_word(OUT_ERROR, 0)
            }
            Err(code) => self.store_word(OUT_ERROR, code),
        }
    }

    fn ecdsa_verify(&mut self) -> Result<(), Fault> {
        use ecdsa_verify::*;

        let (curve, words) = self.curve(IN_MOD_NB_BITS, IN_A_COEFF_SIGN, IN_A_COEFF, IN_MOD_GF)?;
        let n_words: usize = Self::words(self.word(IN_ORDER_NB_BITS));
        let n: BigUint = Self::nonzero(self.uint(IN_ORDER_N, n_words)?)?;
        let g: Point = self.point(IN_INITIAL_POINT_X, IN_INITIAL_POINT_Y, words)?;
        let q: Point = self.point(IN_PUBLIC_KEY_POINT_X, IN_PUBLIC_KEY_POINT_Y, words)?;
        let r: BigUint = self.uint(IN_SIGNATURE_R, n_words)?;
        let s: BigUint = self.uint(IN_SIGNATURE_S, n_words)?;
        let z: BigUint = self.uint(IN_HASH_E, n_words)?;
        let valid: bool = arith::ecdsa_verify(&curve, &g, &n, &q, &z, &r, &s);
        self.store_word(OUT_RESULT, u32::from(!valid))
    }
}

#[derive(Debug)]
struct Shared {
    regs: Mutex<Regs>,
    completion: Completion,
}

/// Software PKA.
///
/// # Example
///
/// ```
/// use stm32l4_hal_pka::{Pka, WaitMode};
/// use stm32l4_pka_sim::SimPka;
///
/// let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
/// // 65^17 mod 3233
/// let out = pka.modular_exp(&[0x0C, 0xA1], &[0x11], &[0x41], WaitMode::POLL)?;
/// assert_eq!(out.as_be_bytes(), &[0x0A, 0xE6]);
/// # Ok::<(), stm32l4_hal_pka::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SimPka {
    shared: Arc<Shared>,
}

impl Default for SimPka {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPka {
    /// Create an enabled PKA with zero latency.
    pub fn new() -> SimPka {
        SimPka {
            shared: Arc::new(Shared {
                regs: Mutex::new(Regs::new()),
                completion: Completion::new(),
            }),
        }
    }

    /// Set the number of ticks an operation takes, returning the modified PKA.
    #[must_use]
    pub fn with_latency(self, ticks: u32) -> SimPka {
        self.regs().latency = ticks;
        self
    }

    /// Make the next operation fail with `fault` instead of computing.
    pub fn inject_fault(&self, fault: Fault) {
        self.regs().injected = Some(fault);
    }

    /// Advance the clock by one tick.
    pub fn step(&self) {
        self.regs().tick();
        self.deliver_irq();
    }

    /// Returns `true` while an operation is in progress.
    pub fn is_busy(&self) -> bool {
        self.regs().busy()
    }

    /// Number of operations started.
    pub fn starts(&self) -> usize {
        self.regs().starts
    }

    /// Number of interrupts delivered.
    pub fn irqs(&self) -> usize {
        self.regs().irqs
    }

    /// Peek a RAM word without bus side effects.
    pub fn peek(&self, offset: usize) -> u32 {
        self.regs().word(offset)
    }

    /// Returns `true` if every RAM word is zero.
    pub fn ram_is_zero(&self) -> bool {
        self.regs().ram.iter().all(|&dw| dw == 0)
    }

    fn regs(&self) -> MutexGuard<'_, Regs> {
        self.shared
            .regs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver_irq(&self) {
        {
            let mut regs = self.regs();
            if regs.in_isr || !regs.irq_line() {
                return;
            }
            regs.in_isr = true;
            regs.irqs += 1;
        }
        self.clone().service_interrupt();
        self.regs().in_isr = false;
    }
}

impl PkaPeripheral for SimPka {
    fn cr(&self) -> u32 {
        self.regs().cr
    }

    fn set_cr(&mut self, val: u32) {
        {
            let mut regs = self.regs();
            let start: bool = val & (cr::EN | cr::START) == (cr::EN | cr::START) && !regs.busy();
            regs.cr = val & !cr::START;
            if start {
                regs.start(cr::mode_of(val));
            }
        }
        self.deliver_irq();
    }

    fn sr(&mut self) -> Status {
        let bits: u32 = {
            let mut regs = self.regs();
            regs.tick();
            regs.sr
        };
        self.deliver_irq();
        Status::from_bits(bits)
    }

    fn clear_flags(&mut self, val: u32) {
        let mut regs = self.regs();
        regs.sr &= !(val & clrfr::ALL & FLAGS);
    }

    fn write_word(&mut self, offset: usize, word: u32) {
        {
            let mut regs = self.regs();
            if let Some(idx) = regs.access(offset) {
                regs.ram[idx] = word;
            }
        }
        self.deliver_irq();
    }

    fn read_word(&mut self, offset: usize) -> u32 {
        let word: u32 = {
            let mut regs = self.regs();
            regs.access(offset).map_or(0, |idx| regs.ram[idx])
        };
        self.deliver_irq();
        word
    }

    fn completion(&self) -> &Completion {
        &self.shared.completion
    }

    fn wait_for_interrupt(&mut self) {
        self.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_complete() {
        let mut pka: SimPka = SimPka::new().with_latency(2);
        pka.write_word(montgomery::IN_MOD_NB_BITS, 32);
        pka.write_word(montgomery::IN_MODULUS, 0xFFFF_FFFB);
        pka.set_cr(cr::EN | cr::START | cr::mode(MODE_MONTGOMERY));
        assert!(pka.sr().busy());
        assert!(pka.sr().busy());
        let status: Status = pka.sr();
        assert!(status.procend());
        assert_eq!(status.fault(), None);
        assert_eq!(pka.peek(montgomery::OUT_PARAMETER), 25);
        assert_eq!(pka.cr() & cr::START, 0);
    }

    #[test]
    fn ram_access_while_busy() {
        let mut pka: SimPka = SimPka::new().with_latency(10);
        pka.write_word(montgomery::IN_MOD_NB_BITS, 32);
        pka.write_word(montgomery::IN_MODULUS, 7);
        pka.set_cr(cr::EN | cr::START | cr::mode(MODE_MONTGOMERY));
        assert_eq!(pka.read_word(montgomery::OUT_PARAMETER), 0);
        let status: Status = pka.sr();
        assert!(!status.busy());
        assert_eq!(status.fault(), Some(Fault::Ram));
    }

    #[test]
    fn unmapped_address() {
        let mut pka: SimPka = SimPka::new();
        pka.write_word(RAM_END, 1);
        assert_eq!(pka.sr().fault(), Some(Fault::Address));
        pka.clear_flags(clrfr::ALL);
        assert_eq!(pka.sr().bits(), 0);
    }

    #[test]
    fn zero_modulus() {
        let mut pka: SimPka = SimPka::new();
        pka.write_word(mod_exp::IN_OP_NB_BITS, 32);
        pka.set_cr(cr::EN | cr::START | cr::mode(MODE_MONTGOMERY_EXP));
        assert_eq!(pka.sr().fault(), Some(Fault::Address));
    }

    #[test]
    fn irq_on_enable_with_flag_set() {
        let mut pka: SimPka = SimPka::new();
        pka.write_word(montgomery::IN_MOD_NB_BITS, 32);
        pka.write_word(montgomery::IN_MODULUS, 7);
        pka.set_cr(cr::EN | cr::START | cr::mode(MODE_MONTGOMERY));
        pka.step();
        assert_eq!(pka.irqs(), 0);
        let ctrl: u32 = pka.cr();
        pka.set_cr(ctrl | cr::IE_MASK);
        assert_eq!(pka.irqs(), 1);
        assert!(pka.completion().take().is_some_and(|s| s.procend()));
        assert_eq!(pka.cr() & cr::IE_MASK, 0);
        assert_eq!(pka.sr().bits(), 0);
    }
}
