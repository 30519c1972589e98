//! Character translation between the DAAD character set and ISO-8859-15
//!
//! DAAD stores game text complemented (`255 - c`) with the Spanish
//! characters packed into the 16..31 control range. Token strings use a
//! second, uncomplemented table.

use encoding_rs::ISO_8859_15;

/// Raw byte that ends every message. Translates to a newline.
pub const TEXT_TERMINATOR: u8 = 0xF5;

/// Host newline, the translation of [`TEXT_TERMINATOR`]
pub const NEWLINE: u8 = 0x0A;

/// Token-stream bytes (high bit already masked) to ISO-8859-15
pub const TOKEN_TO_HOST: [u8; 128] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, //
    10, 11, 12, 13, 14, 15, 170, 161, 191, 171, //
    187, 225, 233, 237, 243, 250, 241, 209, 231, 199, //
    252, 220, b'_', 33, 34, 35, 36, 37, 38, 39, //
    40, 41, 42, 43, 44, 45, 46, 47, 48, 49, //
    50, 51, 52, 53, 54, 55, 56, 57, 58, 59, //
    60, 61, 62, 63, 64, 65, 66, 67, 68, 69, //
    70, 71, 72, 73, 74, 75, 76, 77, 78, 79, //
    80, 81, 82, 83, 84, 85, 86, 87, 88, 89, //
    90, 91, 92, 93, 94, 95, 96, 97, 98, 99, //
    100, 101, 102, 103, 104, 105, 106, 107, 108, 109, //
    110, 111, 112, 113, 114, 115, 116, 117, 118, 119, //
    120, 121, 122, 123, 124, 125, 126, 127,
];

/// General game-text bytes to ISO-8859-15
pub const DAAD_TO_HOST: [u8; 256] = [
    255, 254, 253, 252, 251, 250, 249, 248, 247, 246, //   0
    245, 244, 243, 242, 241, 240, 239, 238, 237, 236, //  10
    235, 234, 233, 232, 231, 230, 229, 228, 227, 226, //  20
    225, 224, 223, 222, 221, 220, 219, 218, 217, 216, //  30
    215, 214, 213, 212, 211, 210, 209, 208, 207, 206, //  40
    205, 204, 203, 202, 201, 200, 199, 198, 197, 196, //  50
    195, 194, 193, 192, 191, 190, 189, 188, 187, 186, //  60
    185, 184, 183, 182, 181, 180, 179, 178, 177, 176, //  70
    175, 174, 173, 172, 171, 170, 169, 168, 167, 166, //  80
    165, 164, 163, 162, 161, 160, 159, 158, 157, 156, //  90
    155, 154, 153, 152, 151, 150, 149, 148, 147, 146, // 100
    145, 144, 143, 142, 141, 140, 139, 138, 137, 136, // 110
    135, 134, 133, 132, 131, 130, 129, 128, 127, 126, // 120
    125, 124, 123, 122, 121, 120, 119, 118, 117, 116, // 130
    115, 114, 113, 112, 111, 110, 109, 108, 107, 106, // 140
    105, 104, 103, 102, 101, 100, 99, 98, 97, 96, // 150
    95, 94, 93, 92, 91, 90, 89, 88, 87, 86, // 160
    85, 84, 83, 82, 81, 80, 79, 78, 77, 76, // 170
    75, 74, 73, 72, 71, 70, 69, 68, 67, 66, // 180
    65, 64, 63, 62, 61, 60, 59, 58, 57, 56, // 190
    55, 54, 53, 52, 51, 50, 49, 48, 47, 46, // 200
    45, 44, 43, 42, 41, 40, 39, 38, 37, 36, // 210
    35, 34, 33, 32, 220, 252, 199, 231, 209, 241, // 220
    250, 243, 237, 233, 225, 187, 171, 191, 161, 170, // 230
    15, 14, 13, 12, 11, 10, 9, 8, 7, 6, // 240
    5, 4, 3, 2, 1, 0, // 250
];

#[inline]
pub fn token_to_host(c: u8) -> u8 {
    TOKEN_TO_HOST[(c & 0x7F) as usize]
}

#[inline]
pub fn daad_to_host(c: u8) -> u8 {
    DAAD_TO_HOST[c as usize]
}

/// Convert translated host bytes to a Rust string
pub fn host_to_string(bytes: &[u8]) -> String {
    let (text, _) = ISO_8859_15.decode_without_bom_handling(bytes);
    text.into_owned()
}
