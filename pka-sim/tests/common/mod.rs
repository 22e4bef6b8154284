#![allow(dead_code)]

use hex_literal::hex;

// RSA-2048 key and a message encrypted with the public key
pub const RSA_PUB_2048_MODULUS: [u8; 256] = hex!(
    "
    b1 b7 85 33 88 05 1f 02 f6 d7 e2 c1 d0 ad 68 3b
    71 16 ae 22 3d 64 8e 5a 7b 5d 53 df 3e 85 b2 14
    e3 56 71 a4 26 45 77 d5 a7 87 16 78 29 dc 58 44
    aa 7d 77 42 30 ce ec 64 3f 84 b0 50 bb 37 c6 12
    aa 08 06 c7 3f a8 74 39 98 11 fa fa 34 72 49 de
    8f e3 7f c3 e2 a4 51 d1 09 59 15 29 db 56 50 44
    83 c8 8e 87 d9 19 1d c3 c2 25 d6 cd 09 46 b4 be
    45 8f 79 2c 83 f4 b6 8c 5b 56 70 c5 48 3a a2 90
    4a 52 fe f2 87 12 b9 2a 0c 1c b8 7f b0 9e 81 ff
    b7 12 11 da 31 2f cb 63 00 7a a3 d5 8b 47 39 83
    54 02 53 bc 5e 12 d2 ae 5a 54 42 fc ab 0a a2 e6
    6b 41 79 c5 e0 84 2a 59 14 d5 f6 d1 ec 6f fd 80
    8c 94 5c bb ad dc 0b d8 ac f3 c8 e8 ee 53 d1 6e
    da 35 4a 5c 3a da 11 68 d6 5b 07 33 8c 86 0b 5c
    cb 00 7b a8 4b e8 1d aa 78 b1 af ed 63 38 33 a4
    7b 72 2d f2 c2 e8 fa 32 58 f1 66 e4 47 d7 4c e7
    "
);

pub const RSA_PUB_2048_PUBLIC_EXPONENT: [u8; 3] = hex!("01 00 01");

pub const RSA_PRIV_2048_PRIME1: [u8; 128] = hex!(
    "
    e0 bd fc da 3d 42 2b 20 1f 24 60 d9 1f 5d 33 08
    da a9 ef 53 ac 1d 7d 3d 9f 28 75 0a 1d 7f 5d b4
    f5 16 16 bb c6 09 35 b9 59 ef 6f f4 28 00 90 14
    a7 34 26 25 3f bc af e7 39 a2 dd 74 33 ae 05 67
    14 a4 ef 77 85 db d8 5b 8e ce 32 c9 9c f5 6f a8
    6d ef 5e e9 9e e5 5b 6b 98 4d 92 46 49 d3 cd d8
    5d 19 8f ba e8 48 0f e1 ce 1a 5d d5 46 40 72 aa
    4d 6e ad 8c fe 56 df 9e f4 ce d7 bf bc a9 42 7b
    "
);

pub const RSA_PRIV_2048_PRIME2: [u8; 128] = hex!(
    "
    ca 6f 2f 0d 74 2b af f6 86 ad f2 e2 43 89 ef 19
    f5 0e 73 9d b5 52 1f e2 5f ef 05 e5 b9 fa d6 d6
    c0 98 1d 65 4a 5a cd 9d c0 1c 07 1d 12 0a b6 8c
    ec fa e8 c0 43 fe 0d f6 12 d5 0f 2d 28 38 1d 01
    ca 7d 9d a8 dc 17 d3 60 de 33 c1 e1 86 c6 7d 42
    d1 98 72 82 4f 6c 95 3a 65 41 1f 7c ba 02 03 2e
    c3 df 44 23 ff 2e ee b3 d9 fd 75 cc ae 1e 52 d9
    55 75 df 1c ac be f5 4f ba fe 15 a5 a2 f1 59 85
    "
);

pub const RSA_PRIV_2048_EXPONENT1: [u8; 128] = hex!(
    "
    7b 77 64 85 f0 c9 7d 2f b4 6c 23 d8 a4 66 6b 37
    1e 09 e5 b5 2e 05 35 5c b9 27 5c c5 25 d7 66 ff
    96 f5 7f 9f c0 f8 26 4f a1 9c ed 00 51 49 9d dd
    fa cd a7 77 27 40 dd d2 45 d3 b7 9d b3 16 93 59
    41 fa 2a a4 9b 21 60 07 4c b8 f3 25 d7 d8 ee 72
    b5 92 9f ad f0 e1 48 0c 20 2b dd 84 47 e2 d8 5f
    59 26 45 d4 04 f0 31 e9 77 74 fc bf c2 4c 7d b2
    19 c0 08 10 41 5a 30 97 ff 1d f3 61 1e a0 4e 29
    "
);

pub const RSA_PRIV_2048_EXPONENT2: [u8; 128] = hex!(
    "
    76 7c 43 47 15 a2 e8 78 5b f5 fe 7e ae d7 52 2a
    98 43 a0 2a 43 d1 d0 b5 b8 3e f7 ed b1 40 7f 74
    ec ff 5b dd 48 7b 03 74 7c d8 2a d5 ba 14 a9 2a
    ad 1e 63 12 fd f8 fa 84 f8 1a da aa 2c ab 43 57
    24 05 08 3d a8 ad 0d 5c da 51 e2 fe 34 db 82 bf
    94 5c 2d 51 d6 59 10 b3 40 46 b0 be 59 45 0a 45
    da 01 99 29 94 98 0c c1 1a 2b 7f 42 90 fb 50 b4
    c2 8f 9e 4a 73 55 c5 d1 a7 fa 46 03 4f ef 01 dd
    "
);

pub const RSA_PRIV_2048_COEFFICIENT: [u8; 128] = hex!(
    "
    4a b5 a6 67 5e 00 6c f1 e9 42 c0 1f 17 cc 18 08
    b4 b0 ec 53 c6 e1 d8 91 f0 6a 36 10 7e 76 c8 35
    78 49 64 f3 19 4c 01 4d 87 ae 68 9d 70 cb 1d 89
    53 e9 e1 f5 7f 96 ab 75 e9 63 cc 38 d3 47 a2 32
    8d a1 aa 10 d5 78 91 3f b3 28 0d dc 0d 17 a1 e1
    b5 80 be 2c 75 f1 97 43 c9 68 dd e9 26 bb 3e d8
    7c de 70 f5 54 fb 80 48 91 95 6f b6 f3 12 92 91
    ba d8 2d 1b 52 c1 d4 fb 1f 1f 0c cf 3e 80 48 10
    "
);

pub const PLAINTEXT_BIN: [u8; 256] = hex!(
    "
    00 71 72 a2 6f 1e ce fa 8f f2 1d 04 90 1e 72 3b
    72 f5 3d bd 89 40 e1 02 4a 09 8a 53 8f 25 1c 57
    fd 76 8d c9 0a 14 e8 9b fd cd 21 5b b0 4b a8 b1
    f9 71 2a bc 23 b8 8a e3 2d b9 0b 18 67 e7 cb f9
    bc 31 05 77 01 7f 93 5c c1 84 17 26 e5 20 af ed
    03 0e 27 7e ea 66 e5 5e bd de 7c d1 1b e6 75 dd
    5c ac 5f 9c 72 5f e9 8c 54 2e f1 c8 37 6f 8f c4
    62 2c 21 8c ee ff 7d 4a 25 64 ed 17 37 23 9f 6f
    eb 0b 86 6c cb ee 79 80 af 1e 97 eb 18 ff f7 0c
    d5 82 8f a4 e9 60 66 d3 89 64 ab b5 0a 39 96 37
    74 3e c2 1a a7 82 b5 48 ff 1c c6 0f f7 be f6 ce
    ff ac 16 2c ab 01 0e e8 dc 52 37 7e 50 58 ee e3
    b9 87 af a5 82 ef b2 6b 98 3b 99 f8 05 2c fe 65
    90 b0 43 ab b2 0c 82 9f 76 66 11 91 c6 80 33 da
    74 01 50 f1 80 20 fc ac c0 9f 94 eb 10 90 58 59
    5e da d2 91 19 3f 1d 5d 04 59 d1 20 b8 36 8d d1
    "
);

pub const CIPHERTEXT_BIN: [u8; 256] = hex!(
    "
    17 61 60 bc 5f b5 12 7e 1d 37 a3 5d 77 ff 06 4e
    39 18 69 53 d5 13 65 ac 3a 0d b4 14 7a b4 35 97
    2d 12 00 f1 cb a5 82 ca 20 00 83 cd 22 52 63 45
    4f 05 16 9a cc 55 c0 12 5f 8a 21 2a 1c 27 30 0f
    9e 3c 56 1e d7 4f 4f 5a 20 d1 75 c2 71 1a db 44
    b4 17 d3 4e 71 c9 e3 f8 30 39 b0 f3 e8 b2 e2 dd
    ef 8b 09 12 75 f4 9a 5f 0c d8 d6 be d2 ac f1 3b
    60 61 ed 7f 8b 9b 0f a3 92 ce 14 19 91 aa 68 08
    9c fe 48 cd 4d 04 5c 11 cd 93 be b2 96 52 99 9a
    71 54 af 4c a3 03 a0 0f 87 20 7f 87 91 ff 8b 14
    35 02 f0 5c 18 b2 17 38 6a 2d 0b 0d cf ab f4 ee
    f1 af bf 50 e1 3a 0f e8 19 88 e5 e6 ce 40 4d 7b
    fa 17 20 f3 7b 88 2a f9 79 a7 21 c5 58 cc 3b f3
    49 85 02 ea d4 cb d9 a5 51 da 51 1e 0c 17 39 d3
    21 0e e9 0c 68 81 0a 53 7d 52 0e 8f 3d 5b a4 43
    93 6d e1 1d 01 ef a9 c8 fe 31 75 ac 88 c2 74 0c
    "
);

// NIST P-256 signature generation and verification
pub const SIGVER_QX: [u8; 32] =
    hex!("1ccbe91c075fc7f4f033bfa248db8fccd3565de94bbfb12f3c59ff46c271bf83");
pub const SIGVER_QY: [u8; 32] =
    hex!("ce4014c68811f9a21a1fdb2c0e6113e06db7ca93b7404e78dc7ccd5ca89a4ca9");
pub const SIGVER_HASH_MSG: [u8; 32] =
    hex!("44acf6b7e36c1342c2c5897204fe09504e1e2efb1a900377dbc4e7a6a133ec56");
pub const SIGVER_HASH_MSG_FALSE: [u8; 32] =
    hex!("44acf6b7e36c1342c2c5897204fe09504e1e2efb1a900377dbc4e7a6a133ec57");
pub const SIGVER_R: [u8; 32] =
    hex!("f3ac8061b514795b8843e3d6629527ed2afd6b1f6a555a7acabb5e6f79c8c2ac");
pub const SIGVER_S: [u8; 32] =
    hex!("8bf77819ca05a6b2786c76262bf7371cef97b218e96f175a3ccdda2acc058903");

pub const SIGGEN_PRIVATE_KEY: [u8; 32] =
    hex!("519b423d715f8b581f4fa8ee59f4771a5b44c8130b4e3eacca54a56dda72b464");
// Note: in real-world use this should be a one-time random number (nonce).
// This fixed value is for testing purposes only.
pub const SIGGEN_NONCE: [u8; 32] =
    hex!("94a1bbb14b906a61a280f245f9e93c7f3b4a6247824f5d33b9670787642a68de");

// point on curve
pub const PKV1_QX: [u8; 32] = SIGVER_QX;
pub const PKV1_QY: [u8; 32] = SIGVER_QY;
// point off curve
pub const PKV2_QX: [u8; 32] = SIGVER_QX;
pub const PKV2_QY: [u8; 32] =
    hex!("ce4014c68811f9a21a1fdb2c0e6113e06db7ca93b7404e78dc7ccd5ca89a4cb9");

// Montgomery parameter of the P-256 modulus, R = 2^256
pub const P256_R2: [u8; 32] =
    hex!("00000004fffffffdfffffffffffffffefffffffbffffffff0000000000000003");

// private key and public key for scalar multiplication
pub const SCALAR_D: [u8; 32] =
    hex!("49ac8727cee87484fe6dfda510238ad411ace8fe593a8cb70492d659db81802a");
pub const SCALAR_QX: [u8; 32] =
    hex!("fa655759dec3902896460a432bae1d009126e1b488789ff4ef6b9a9bde1bc363");
pub const SCALAR_QY: [u8; 32] =
    hex!("8fa02ac4c421ca884f0651f4e985e3cfd0af4069cc87f3a88a8e95e7556ced97");
