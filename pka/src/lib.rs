//! Public key accelerator driver for the STM32L4 series.
//!
//! The driver is a session state machine over the accelerator:
//!
//! ```text
//! Idle -> OperandsLoaded -> Running -> {Completed, Failed} -> Idle
//! ```
//!
//! 1. [`Pka::configure`] validates the operands and loads them into the
//!    accelerator RAM.
//! 2. [`Pka::start`] triggers the operation.
//! 3. [`Pka::wait`], [`Pka::poll`], or `Pka::aio_wait` resolve the completion.
//! 4. [`Pka::read_result`] or [`Pka::read_error`] read out the session and
//!    release the accelerator.
//!
//! The blocking helpers ([`Pka::modular_exp`], [`Pka::ecdsa_verify`], ...) run
//! all four steps.
//!
//! # Example
//!
//! ```no_run
//! use stm32l4_hal_pka::{
//!     Pka, WaitMode,
//!     curve::NIST_P256,
//!     hw::{PKA_BASE, PkaRegs},
//! };
//!
//! # let (qx, qy, hash, r, s) = ([0u8; 32], [0u8; 32], [0u8; 32], [0u8; 32], [0u8; 32]);
//! let mut regs: PkaRegs = unsafe { PkaRegs::new(PKA_BASE) };
//! regs.enable();
//! let mut pka: Pka<PkaRegs> = Pka::new(regs);
//!
//! let valid: bool = pka.ecdsa_verify(&NIST_P256, (&qx, &qy), &hash, (&r, &s), WaitMode::POLL)?;
//! # Ok::<(), stm32l4_hal_pka::Error>(())
//! ```
#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod codec;
pub mod curve;
mod error;
pub mod hw;
pub mod layout;
mod op;
mod operand;
pub mod periph;

pub use error::{Error, Fault, OperandTooLarge};
pub use nb;
pub use op::{CurvePoint, EcdsaSignature, OperationKind, ResultSet};
pub use operand::{OperandName, OperandSet, Sign};

use codec::Operand;
use curve::EllipticCurve;
use layout::Widths;
use periph::{PkaPeripheral, Status, clrfr, cr};

/// Session state.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No session.
    Idle,
    /// Operands are loaded, the operation has not been started.
    OperandsLoaded,
    /// The operation is in progress.
    Running,
    /// The operation completed, results can be read.
    Completed,
    /// The accelerator reported a fault.
    Failed,
}

/// Completion wait strategy.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitMode {
    /// Busy-wait on the status register.
    Poll {
        /// Number of status reads before giving up with [`Error::Timeout`].
        max_polls: u32,
    },
    /// Enable the PKA interrupts and sleep until the interrupt adapter
    /// resolves the completion.
    ///
    /// The PKA interrupt must be unmasked in the NVIC and its handler must call
    /// [`hw::on_interrupt`].
    Interrupt,
}

impl WaitMode {
    /// Polling with the default budget of 2,000,000 status reads.
    pub const POLL: WaitMode = WaitMode::Poll {
        max_polls: 2_000_000,
    };
}

impl Default for WaitMode {
    fn default() -> Self {
        WaitMode::POLL
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    kind: OperationKind,
    widths: Widths,
}

/// ECDSA public key, big-endian coordinates.
pub type PublicKey<'a> = (&'a [u8], &'a [u8]);

/// ECDSA signature parts (r, s), big-endian.
pub type SignatureParts<'a> = (&'a [u8], &'a [u8]);

/// PKA driver.
///
/// Created with [`Pka::new`].
#[derive(Debug)]
pub struct Pka<P> {
    periph: P,
    state: State,
    session: Option<Session>,
    fault: Option<Fault>,
}

impl<P: PkaPeripheral> Pka<P> {
    /// Create a new PKA driver.
    ///
    /// The peripheral must be enabled.
    pub fn new(periph: P) -> Pka<P> {
        Pka {
            periph,
            state: State::Idle,
            session: None,
            fault: None,
        }
    }

    /// Free the peripheral from the driver.
    pub fn free(self) -> P {
        self.periph
    }

    /// Session state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Operation loaded in the current session, if any.
    pub fn operation(&self) -> Option<OperationKind> {
        self.session.map(|s| s.kind)
    }

    /// Borrow the peripheral.
    pub fn peripheral(&self) -> &P {
        &self.periph
    }

    /// Mutably borrow the peripheral.
    ///
    /// Register writes made through this reference are not tracked by the
    /// session state.
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.periph
    }

    /// Validate `ops` for `kind` and load them into the accelerator.
    ///
    /// Leading zero bytes are stripped before width checks.
    /// A previous session that is loaded, completed, or failed is discarded.
    ///
    /// # Errors
    ///
    /// * [`Error::Busy`] if an operation is running.
    /// * [`Error::MissingOperand`] if a required operand is absent.
    /// * [`Error::OperandTooLarge`] if an operand exceeds the accelerator
    ///   limit for `kind`, or does not fit its slot (e.g. a base wider than
    ///   the modulus).
    ///
    /// Nothing is written to the accelerator when an error is returned.
    pub fn configure(&mut self, kind: OperationKind, ops: &OperandSet) -> Result<(), Error> {
        if self.state == State::Running {
            return Err(Error::Busy);
        }

        let required: &[OperandName] = kind.required_operands();
        if let Some(&name) = required.iter().find(|&&name| ops.get(name).is_none()) {
            return Err(Error::MissingOperand(name));
        }

        let widths: Widths = layout::widths(kind, ops);
        for &name in required {
            let value: &[u8] = stripped(ops, name)?;
            let too_large: bool = value.len() > kind.max_bytes()
                || layout::slot(kind, name, &widths).is_some_and(|loc| value.len() > loc.limit);
            if too_large {
                return Err(Error::OperandTooLarge(name));
            }
        }
        // CRT modulus is twice the prime width
        if widths.op > kind.max_bytes() {
            return Err(Error::OperandTooLarge(layout::op_width_source(kind, ops)));
        }

        if self.state != State::Idle {
            debug!("PKA discarding {} session", self.state);
            self.release();
        }

        self.periph.clear_flags(clrfr::ALL);
        self.periph.zero_ram();
        layout::header(kind, &widths, ops.coef_sign())
            .iter()
            .for_each(|&(offset, word)| self.periph.write_word(offset, word));
        for &name in required {
            if let Some(loc) = layout::slot(kind, name, &widths) {
                match codec::encode(stripped(ops, name)?, loc.width) {
                    Ok(slot) => self.periph.write_slot(loc.offset, &slot),
                    Err(_) => {
                        warn!("PKA {} slot overflow", name);
                        self.release();
                        return Err(Error::OperandTooLarge(name));
                    }
                }
            }
        }

        self.session = Some(Session { kind, widths });
        self.state = State::OperandsLoaded;
        debug!("PKA configured {}", kind);
        Ok(())
    }

    /// Start the loaded operation.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] unless the state is
    ///   [`State::OperandsLoaded`].
    pub fn start(&mut self) -> Result<(), Error> {
        let session: Session = match (self.state, self.session) {
            (State::OperandsLoaded, Some(session)) => session,
            (state, _) => return Err(Error::InvalidState(state)),
        };
        self.periph.completion().reset();
        self.periph
            .set_cr(cr::EN | cr::START | cr::mode(session.kind.opcode().into()));
        self.state = State::Running;
        trace!("PKA started {}", session.kind);
        Ok(())
    }

    /// Check for completion once.
    ///
    /// Returns [`nb::Error::WouldBlock`] while the operation is in progress.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] unless the state is [`State::Running`].
    /// * [`Error::Ram`] or [`Error::Address`] if the accelerator reported a
    ///   fault; the state is then [`State::Failed`].
    pub fn poll(&mut self) -> nb::Result<(), Error> {
        self.check_running()?;
        let status: Status = match self.periph.completion().take() {
            Some(status) => status,
            None => self.periph.sr(),
        };
        if status.is_done() {
            self.finish(status).map_err(nb::Error::Other)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Wait for the running operation to complete.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] unless the state is [`State::Running`].
    /// * [`Error::Timeout`] if the polling budget is exhausted; the operation
    ///   is still running and waiting again is allowed.
    /// * [`Error::Ram`] or [`Error::Address`] if the accelerator reported a
    ///   fault; the state is then [`State::Failed`].
    pub fn wait(&mut self, mode: WaitMode) -> Result<(), Error> {
        match mode {
            WaitMode::Poll { max_polls } => {
                let mut attempts: u32 = 0;
                loop {
                    match self.poll() {
                        Ok(()) => return Ok(()),
                        Err(nb::Error::Other(e)) => return Err(e),
                        Err(nb::Error::WouldBlock) => attempts = attempts.saturating_add(1),
                    }
                    if attempts >= max_polls {
                        warn!("PKA timeout after {} polls", attempts);
                        return Err(Error::Timeout);
                    }
                }
            }
            WaitMode::Interrupt => {
                self.check_running()?;
                self.enable_irq();
                loop {
                    if let Some(status) = self.periph.completion().take() {
                        return self.finish(status);
                    }
                    self.periph.wait_for_interrupt();
                }
            }
        }
    }

    /// Wait for the running operation to complete, asynchronously.
    ///
    /// The PKA interrupt must be unmasked in the NVIC and its handler must call
    /// [`hw::on_interrupt`].
    ///
    /// # Errors
    ///
    /// Same as [`wait`](Self::wait), without [`Error::Timeout`].
    #[cfg(feature = "aio")]
    #[cfg_attr(docsrs, doc(cfg(feature = "aio")))]
    pub async fn aio_wait(&mut self) -> Result<(), Error> {
        self.check_running()?;
        self.enable_irq();
        let status: Status =
            futures_util::future::poll_fn(|cx| self.periph.completion().poll(cx)).await;
        self.finish(status)
    }

    /// Read the result of the completed session and release the accelerator.
    ///
    /// # Errors
    ///
    /// * [`Error::ResultNotReady`] unless the state is [`State::Completed`].
    /// * [`Error::Mode`] if `kind` is not the operation that was loaded; the
    ///   session is kept.
    /// * [`Error::Rzero`], [`Error::Szero`], or [`Error::Unknown`] for an
    ///   ECDSA signing failure; the accelerator RAM is zeroed and a new nonce
    ///   should be used.
    pub fn read_result(&mut self, kind: OperationKind) -> Result<ResultSet, Error> {
        let session: Session = match (self.state, self.session) {
            (State::Completed, Some(session)) => session,
            _ => return Err(Error::ResultNotReady),
        };
        if session.kind != kind {
            return Err(Error::Mode {
                configured: session.kind,
            });
        }

        let width: usize = session.widths.result(kind);
        let ret: Result<ResultSet, Error> = match kind {
            OperationKind::ModExp => Ok(ResultSet::Value(
                self.read_operand(layout::mod_exp::OUT_RESULT, width),
            )),
            OperationKind::ModExpCrt => Ok(ResultSet::Value(
                self.read_operand(layout::rsa_crt::OUT_RESULT, width),
            )),
            OperationKind::MontgomeryParam => Ok(ResultSet::Value(
                self.read_operand(layout::montgomery::OUT_PARAMETER, width),
            )),
            OperationKind::EcdsaSign => {
                // Reference manual "ECDSA sign - Outputs":
                // If error output is different from zero the content of the PKA
                // memory should be cleared to avoid leaking information about
                // the private key.
                match self.periph.read_word(layout::ecdsa_sign::OUT_ERROR) {
                    0 => Ok(ResultSet::Signature(EcdsaSignature {
                        r: self.read_operand(layout::ecdsa_sign::OUT_SIGNATURE_R, width),
                        s: self.read_operand(layout::ecdsa_sign::OUT_SIGNATURE_S, width),
                    })),
                    1 => Err(Error::Rzero),
                    2 => Err(Error::Szero),
                    bits => Err(Error::Unknown { bits }),
                }
            }
            OperationKind::EcdsaVerify => Ok(ResultSet::Valid(
                self.periph.read_word(layout::ecdsa_verify::OUT_RESULT) == 0,
            )),
            OperationKind::PointCheck => Ok(ResultSet::Valid(
                self.periph.read_word(layout::point_check::OUT_ERROR) == 0,
            )),
            OperationKind::EccScalarMul => Ok(ResultSet::Point(CurvePoint {
                x: self.read_operand(layout::ecc_scalar_mul::OUT_RESULT_X, width),
                y: self.read_operand(layout::ecc_scalar_mul::OUT_RESULT_Y, width),
            })),
        };

        self.release();
        ret
    }

    /// Read the fault of the failed session and release the accelerator.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidState`] unless the state is [`State::Failed`].
    pub fn read_error(&mut self) -> Result<Fault, Error> {
        let fault: Fault = match (self.state, self.fault) {
            (State::Failed, Some(fault)) => fault,
            (state, _) => return Err(Error::InvalidState(state)),
        };
        self.release();
        Ok(fault)
    }

    /// Configure, start, wait, and read the result.
    ///
    /// On a hardware fault the session is released before the error is
    /// returned.
    /// On [`Error::Timeout`] the operation is left running.
    pub fn run(
        &mut self,
        kind: OperationKind,
        ops: &OperandSet,
        mode: WaitMode,
    ) -> Result<ResultSet, Error> {
        self.configure(kind, ops)?;
        self.start()?;
        match self.wait(mode) {
            Ok(()) => self.read_result(kind),
            Err(e @ (Error::Ram | Error::Address)) => {
                self.release();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Modular exponentiation, base<sup>exponent</sup> mod modulus.
    ///
    /// The result is as wide as the modulus.
    pub fn modular_exp(
        &mut self,
        modulus: &[u8],
        exponent: &[u8],
        base: &[u8],
        mode: WaitMode,
    ) -> Result<Operand, Error> {
        let ops: OperandSet = OperandSet::new()
            .with(OperandName::Modulus, modulus)
            .with(OperandName::Exponent, exponent)
            .with(OperandName::Base, base);
        self.run_value(OperationKind::ModExp, &ops, mode)
    }

    /// Modular exponentiation with the Chinese remainder theorem.
    ///
    /// `key` is (p, q, dp, dq, qinv).
    /// The result is twice as wide as the widest prime.
    pub fn modular_exp_crt(
        &mut self,
        key: (&[u8], &[u8], &[u8], &[u8], &[u8]),
        base: &[u8],
        mode: WaitMode,
    ) -> Result<Operand, Error> {
        let (p, q, dp, dq, qinv) = key;
        let ops: OperandSet = OperandSet::new()
            .with(OperandName::PrimeP, p)
            .with(OperandName::PrimeQ, q)
            .with(OperandName::CrtDp, dp)
            .with(OperandName::CrtDq, dq)
            .with(OperandName::CrtQinv, qinv)
            .with(OperandName::Base, base);
        self.run_value(OperationKind::ModExpCrt, &ops, mode)
    }

    /// Montgomery parameter R<sup>2</sup> mod modulus.
    pub fn montgomery_param(&mut self, modulus: &[u8], mode: WaitMode) -> Result<Operand, Error> {
        let ops: OperandSet = OperandSet::new().with(OperandName::Modulus, modulus);
        self.run_value(OperationKind::MontgomeryParam, &ops, mode)
    }

    /// ECDSA (Elliptic Curve Digital Signature Algorithm) signing.
    ///
    /// # Errors
    ///
    /// [`Error::Rzero`] and [`Error::Szero`] require a new `nonce`.
    pub fn ecdsa_sign(
        &mut self,
        curve: &EllipticCurve,
        private_key: &[u8],
        nonce: &[u8],
        hash: &[u8],
        mode: WaitMode,
    ) -> Result<EcdsaSignature, Error> {
        let ops: OperandSet = OperandSet::new()
            .with_curve(curve)
            .with(OperandName::PrivateKey, private_key)
            .with(OperandName::Nonce, nonce)
            .with(OperandName::Hash, hash);
        let kind: OperationKind = OperationKind::EcdsaSign;
        self.run(kind, &ops, mode)?
            .into_signature()
            .ok_or(Error::Mode { configured: kind })
    }

    /// ECDSA (Elliptic Curve Digital Signature Algorithm) verification.
    ///
    /// Returns `true` if the signature is valid.
    pub fn ecdsa_verify(
        &mut self,
        curve: &EllipticCurve,
        public_key: PublicKey,
        hash: &[u8],
        signature: SignatureParts,
        mode: WaitMode,
    ) -> Result<bool, Error> {
        let ops: OperandSet = OperandSet::new()
            .with_curve(curve)
            .with(OperandName::PublicX, public_key.0)
            .with(OperandName::PublicY, public_key.1)
            .with(OperandName::Hash, hash)
            .with(OperandName::SignatureR, signature.0)
            .with(OperandName::SignatureS, signature.1);
        self.run_valid(OperationKind::EcdsaVerify, &ops, mode)
    }

    /// Check that the point (`x`, `y`) is on `curve`.
    ///
    /// This computes the Montgomery parameter of the curve modulus in a first
    /// session, then runs the check in a second.
    pub fn point_check(
        &mut self,
        curve: &EllipticCurve,
        x: &[u8],
        y: &[u8],
        mode: WaitMode,
    ) -> Result<bool, Error> {
        let r2: Operand = self.montgomery_param(curve.modulus, mode)?;
        let ops: OperandSet = OperandSet::new()
            .with_curve(curve)
            .with(OperandName::PointX, x)
            .with(OperandName::PointY, y)
            .with(OperandName::MontgomeryParam, r2.as_be_bytes());
        self.run_valid(OperationKind::PointCheck, &ops, mode)
    }

    /// ECC scalar multiplication, k × (`x`, `y`).
    pub fn ecc_scalar_mul(
        &mut self,
        curve: &EllipticCurve,
        k: &[u8],
        x: &[u8],
        y: &[u8],
        mode: WaitMode,
    ) -> Result<CurvePoint, Error> {
        let ops: OperandSet = OperandSet::new()
            .with_curve(curve)
            .with(OperandName::Scalar, k)
            .with(OperandName::PointX, x)
            .with(OperandName::PointY, y);
        let kind: OperationKind = OperationKind::EccScalarMul;
        self.run(kind, &ops, mode)?
            .into_point()
            .ok_or(Error::Mode { configured: kind })
    }

    fn run_value(
        &mut self,
        kind: OperationKind,
        ops: &OperandSet,
        mode: WaitMode,
    ) -> Result<Operand, Error> {
        self.run(kind, ops, mode)?
            .into_value()
            .ok_or(Error::Mode { configured: kind })
    }

    fn run_valid(
        &mut self,
        kind: OperationKind,
        ops: &OperandSet,
        mode: WaitMode,
    ) -> Result<bool, Error> {
        self.run(kind, ops, mode)?
            .valid()
            .ok_or(Error::Mode { configured: kind })
    }

    fn check_running(&self) -> Result<(), Error> {
        match self.state {
            State::Running => Ok(()),
            state => Err(Error::InvalidState(state)),
        }
    }

    fn enable_irq(&mut self) {
        let ctrl: u32 = self.periph.cr();
        self.periph.set_cr((ctrl & !cr::START) | cr::IE_MASK);
    }

    fn finish(&mut self, status: Status) -> Result<(), Error> {
        self.periph.clear_flags(clrfr::ALL);
        match status.fault() {
            Some(fault) => {
                warn!("PKA fault {} sr={:#X}", fault, status.bits());
                self.fault = Some(fault);
                self.state = State::Failed;
                Err(fault.into())
            }
            None => {
                self.state = State::Completed;
                Ok(())
            }
        }
    }

    fn read_operand(&mut self, offset: usize, width: usize) -> Operand {
        let slot = self.periph.read_slot(offset, width);
        codec::decode(&slot, width)
    }

    /// Zero the RAM and return to idle.
    fn release(&mut self) {
        let ctrl: u32 = self.periph.cr();
        self.periph.set_cr(ctrl & !(cr::IE_MASK | cr::START));
        self.periph.clear_flags(clrfr::ALL);
        self.periph.zero_ram();
        self.periph.completion().reset();
        self.session = None;
        self.fault = None;
        self.state = State::Idle;
        trace!("PKA idle");
    }
}

fn stripped<'a>(ops: &OperandSet<'a>, name: OperandName) -> Result<&'a [u8], Error> {
    ops.get(name)
        .map(codec::strip_leading_zeros)
        .ok_or(Error::MissingOperand(name))
}
