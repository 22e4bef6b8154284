mod common;

use common::*;
use stm32l4_hal_pka::{
    Error, OperandName, OperandSet, OperationKind, Pka, ResultSet, State, WaitMode,
};
use stm32l4_pka_sim::SimPka;

#[test]
fn rsa_2048_encrypt() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new().with_latency(100));
    let ops: OperandSet = OperandSet::new()
        .with(OperandName::Modulus, &RSA_PUB_2048_MODULUS)
        .with(OperandName::Exponent, &RSA_PUB_2048_PUBLIC_EXPONENT)
        .with(OperandName::Base, &PLAINTEXT_BIN);

    pka.configure(OperationKind::ModExp, &ops).unwrap();
    assert_eq!(pka.state(), State::OperandsLoaded);
    pka.start().unwrap();
    assert_eq!(pka.state(), State::Running);
    pka.wait(WaitMode::POLL).unwrap();
    assert_eq!(pka.state(), State::Completed);

    let result: ResultSet = pka.read_result(OperationKind::ModExp).unwrap();
    assert_eq!(pka.state(), State::Idle);
    let ciphertext = result.into_value().unwrap();
    assert_eq!(ciphertext.as_be_bytes(), &CIPHERTEXT_BIN[..]);
}

#[test]
fn rsa_2048_encrypt_interrupt() {
    let sim: SimPka = SimPka::new().with_latency(20);
    let irq: SimPka = sim.clone();
    let mut pka: Pka<SimPka> = Pka::new(sim);
    let ciphertext = pka
        .modular_exp(
            &RSA_PUB_2048_MODULUS,
            &RSA_PUB_2048_PUBLIC_EXPONENT,
            &PLAINTEXT_BIN,
            WaitMode::Interrupt,
        )
        .unwrap();
    assert_eq!(ciphertext.as_be_bytes(), &CIPHERTEXT_BIN[..]);
    assert_eq!(irq.irqs(), 1);
    assert!(irq.ram_is_zero());
}

#[test]
fn rsa_2048_decrypt_crt() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let plaintext = pka
        .modular_exp_crt(
            (
                &RSA_PRIV_2048_PRIME1,
                &RSA_PRIV_2048_PRIME2,
                &RSA_PRIV_2048_EXPONENT1,
                &RSA_PRIV_2048_EXPONENT2,
                &RSA_PRIV_2048_COEFFICIENT,
            ),
            &CIPHERTEXT_BIN,
            WaitMode::POLL,
        )
        .unwrap();
    assert_eq!(plaintext.as_be_bytes(), &PLAINTEXT_BIN[..]);
}

#[test]
fn leading_zeros_are_stripped() {
    let mut modulus: [u8; 260] = [0; 260];
    modulus[4..].copy_from_slice(&RSA_PUB_2048_MODULUS);

    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let ciphertext = pka
        .modular_exp(
            &modulus,
            &[0x00, 0x01, 0x00, 0x01],
            &PLAINTEXT_BIN,
            WaitMode::POLL,
        )
        .unwrap();
    assert_eq!(ciphertext.as_be_bytes(), &CIPHERTEXT_BIN[..]);
}

#[test]
fn small_modulus() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    // 65^17 mod 3233 = 2790
    let out = pka
        .modular_exp(&[0x0C, 0xA1], &[0x11], &[0x41], WaitMode::POLL)
        .unwrap();
    assert_eq!(out.as_be_bytes(), &[0x0A, 0xE6]);
    // 2790^2753 mod 3233 = 65
    let out = pka
        .modular_exp(&[0x0C, 0xA1], &[0x0A, 0xC1], &[0x0A, 0xE6], WaitMode::POLL)
        .unwrap();
    assert_eq!(out.as_be_bytes(), &[0x00, 0x41]);
}

#[test]
fn modulus_too_large() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let modulus: [u8; 257] = [0xFF; 257];
    assert_eq!(
        pka.modular_exp(&modulus, &[3], &[2], WaitMode::POLL),
        Err(Error::OperandTooLarge(OperandName::Modulus))
    );
    assert_eq!(pka.state(), State::Idle);
}

#[test]
fn base_wider_than_modulus() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let ops: OperandSet = OperandSet::new()
        .with(OperandName::Modulus, &[0xFF; 8])
        .with(OperandName::Exponent, &[3])
        .with(OperandName::Base, &[0x01; 12]);
    assert_eq!(
        pka.configure(OperationKind::ModExp, &ops),
        Err(Error::OperandTooLarge(OperandName::Base))
    );
    assert_eq!(pka.state(), State::Idle);
}

#[test]
fn base_one_byte_wider_than_modulus() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let ops: OperandSet = OperandSet::new()
        .with(OperandName::Modulus, &[0xFF; 5])
        .with(OperandName::Exponent, &[3])
        .with(OperandName::Base, &[0x01; 6]);
    assert_eq!(
        pka.configure(OperationKind::ModExp, &ops),
        Err(Error::OperandTooLarge(OperandName::Base))
    );
    assert!(pka.peripheral().ram_is_zero());
}

#[test]
fn crt_modulus_over_2048_bits() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let wide: [u8; 129] = [0xC5; 129];
    let ops: OperandSet = OperandSet::new()
        .with(OperandName::PrimeP, &wide)
        .with(OperandName::PrimeQ, &wide)
        .with(OperandName::CrtDp, &wide)
        .with(OperandName::CrtDq, &wide)
        .with(OperandName::CrtQinv, &wide)
        .with(OperandName::Base, &[0x02]);
    assert_eq!(
        pka.configure(OperationKind::ModExpCrt, &ops),
        Err(Error::OperandTooLarge(OperandName::PrimeP))
    );
    assert_eq!(pka.state(), State::Idle);
    assert!(pka.peripheral().ram_is_zero());

    let ops: OperandSet = ops.with(OperandName::PrimeP, &RSA_PRIV_2048_PRIME1);
    assert_eq!(
        pka.configure(OperationKind::ModExpCrt, &ops),
        Err(Error::OperandTooLarge(OperandName::PrimeQ))
    );
    assert!(pka.peripheral().ram_is_zero());
}

#[test]
fn missing_operand() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let ops: OperandSet = OperandSet::new()
        .with(OperandName::Modulus, &RSA_PUB_2048_MODULUS)
        .with(OperandName::Base, &PLAINTEXT_BIN);
    assert_eq!(
        pka.configure(OperationKind::ModExp, &ops),
        Err(Error::MissingOperand(OperandName::Exponent))
    );
    assert_eq!(
        pka.configure(OperationKind::ModExpCrt, &ops),
        Err(Error::MissingOperand(OperandName::PrimeP))
    );
    assert_eq!(pka.state(), State::Idle);
}

#[test]
fn montgomery_param() {
    let mut pka: Pka<SimPka> = Pka::new(SimPka::new());
    let r2 = pka
        .montgomery_param(stm32l4_hal_pka::curve::NIST_P256.modulus, WaitMode::POLL)
        .unwrap();
    assert_eq!(r2.as_be_bytes(), &P256_R2[..]);
}
