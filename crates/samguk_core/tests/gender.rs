use samguk_core::gender::Gender;
use samguk_core::general::{GENERAL_SIZE, Packed};
use samguk_core::{General, Record};

#[test]
fn maps_gender_bit() {
    assert_eq!(Gender::from_bit(0), Gender::Male);
    assert_eq!(Gender::from_bit(1), Gender::Female);
    assert_eq!(Gender::Female.raw(), 1);
}

#[test]
fn gender_lives_in_personality_bit_six() {
    let mut g = General::decode(0, &[0u8; GENERAL_SIZE]).expect("general");
    g.set_gender(Gender::Female);
    assert_eq!(g.personality, 1 << 9);
    assert_eq!(g.packed(Packed::Gender), 1);
    assert_eq!(g.gender().to_string(), "Female");

    g.set_gender(Gender::Male);
    assert_eq!(g.personality, 0);
}
