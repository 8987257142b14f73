//! Property-based tests for the listing-line decoder.
//!
//! For any line built from the envelope `address : bytes : mnemonic :
//! operands`, decoding and re-rendering must reproduce the mnemonic and
//! comma-joined operand text exactly.

use proptest::prelude::*;
use stackray_core::Instruction;

fn arb_mnemonic() -> impl Strategy<Value = String> {
    "[a-z]{1,6}".prop_filter("must not look like a byte pair", |m| {
        !(m.len() == 2 && m.bytes().all(|b| b.is_ascii_hexdigit()))
    })
}

fn arb_operand() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["eax", "rbx", "r9d", "esi", "rbp", "al", "xmm3"])
            .prop_map(str::to_string),
        (0u32..0x1_0000).prop_map(|v| format!("{v:#x}")),
        (
            prop::sample::select(vec!["BYTE", "WORD", "DWORD", "QWORD"]),
            prop::sample::select(vec!["rbp", "rsp"]),
            -64i64..64,
        )
            .prop_map(|(kw, base, disp)| {
                if disp < 0 {
                    format!("{kw} PTR [{base}-{:#x}]", -disp)
                } else {
                    format!("{kw} PTR [{base}+{disp:#x}]")
                }
            }),
    ]
}

proptest! {
    #[test]
    fn decode_round_trips(
        addr in 0u64..0xffff_ffff,
        nbytes in 1usize..=7,
        mnemonic in arb_mnemonic(),
        operands in prop::collection::vec(arb_operand(), 0..=2),
    ) {
        let bytes = vec!["90"; nbytes].join(" ");
        let text = operands.join(",");
        let line = if text.is_empty() {
            format!("  {addr:x}: {bytes}   {mnemonic}")
        } else {
            format!("  {addr:x}: {bytes}   {mnemonic} {text}")
        };

        let inst = Instruction::parse(&line).unwrap();
        prop_assert_eq!(inst.address, addr);

        let expected = if text.is_empty() {
            mnemonic.clone()
        } else {
            format!("{mnemonic} {text}")
        };
        prop_assert_eq!(inst.to_string(), expected);
    }
}
