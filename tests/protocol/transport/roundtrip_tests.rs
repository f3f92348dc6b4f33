//! End-to-end checks: encoder output streamed through the assembler byte by
//! byte, then decoded.
use triplecan::core::{RawFrame, END, ESCAPE, START};
use triplecan::protocol::config::LinkConfig;
use triplecan::protocol::transport::can_frame::{
    CanFrame, ClassicFrame, ControlTag, Decoded, FdFrame,
};
use triplecan::protocol::transport::can_id::CanId;
use triplecan::protocol::transport::framing::assembler::{FrameAssembler, ProcessResult};
use triplecan::protocol::transport::framing::decoder::decode;
use triplecan::protocol::transport::framing::encoder::FrameEncoder;
use triplecan::protocol::transport::traits::link_observer::NoopObserver;

/// Stream `bytes` through the assembler and collect every decoded item.
fn collect<const MTU: usize>(
    assembler: &mut FrameAssembler<NoopObserver, MTU>,
    bytes: &[u8],
) -> Vec<ProcessResult> {
    bytes
        .iter()
        .map(|&byte| assembler.process_byte(byte))
        .filter(|result| *result != ProcessResult::Pending)
        .collect()
}

fn encode(frame: impl Into<CanFrame>) -> RawFrame {
    FrameEncoder::new(LinkConfig::default())
        .encode(&frame.into())
        .expect("frame must encode")
}

#[test]
fn classic_frame_with_marker_payload() {
    let frame = ClassicFrame::new(CanId::standard(0x123).unwrap(), &[0x0F, 0xEF]).unwrap();
    let raw = encode(frame);

    // Direct path: unstuff then decode.
    assert_eq!(
        decode(raw.unstuffed().as_slice()).unwrap(),
        Decoded::Frame(CanFrame::Classic(frame))
    );

    // Streaming path.
    let mut assembler = FrameAssembler::new();
    let results = collect(&mut assembler, raw.as_slice());
    assert_eq!(results, vec![ProcessResult::Frame(Decoded::Frame(frame.into()))]);
}

#[test]
fn escaped_end_is_not_a_boundary() {
    // START, len, command, id, flags, channel, ESCAPE END (data), END.
    let bytes = [
        START, 0x0C, 0x81, 0x00, 0x00, 0x01, 0x23, 0x01, 0x00, ESCAPE, END, END,
    ];
    let mut assembler = FrameAssembler::new();
    let results = collect(&mut assembler, &bytes);
    assert_eq!(results.len(), 1);
    match results[0] {
        ProcessResult::Frame(Decoded::Frame(CanFrame::Classic(frame))) => {
            assert_eq!(frame.payload(), &[END]);
            assert_eq!(frame.id.raw(), 0x123);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn overflow_then_recovery() {
    let mut assembler: FrameAssembler<NoopObserver, 64> = FrameAssembler::default();
    let garbage = [0xAAu8; 100];
    let results = collect(&mut assembler, &garbage);
    assert_eq!(results, vec![ProcessResult::Overflow]);
    assert!(assembler.in_error());

    let frame = ClassicFrame::new(CanId::extended(0x18FE_F100).unwrap(), &[1, 2, 3, 4])
        .unwrap()
        .on_channel(2);
    let raw = encode(frame);

    let mut stream = vec![END];
    stream.extend_from_slice(raw.as_slice());
    let results = collect(&mut assembler, &stream);
    assert_eq!(
        results,
        vec![
            ProcessResult::Discarded,
            ProcessResult::Frame(Decoded::Frame(frame.into())),
        ]
    );
    assert_eq!(assembler.stats().rx_over_errors, 1);
    assert_eq!(assembler.stats().rx_frames, 1);
}

#[test]
fn fd_frame_with_64_bytes_and_flags() {
    let data: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(0x1F)).collect();
    let frame = FdFrame::new(CanId::extended(0x0ABC_DEF1).unwrap(), &data)
        .unwrap()
        .on_channel(1)
        .with_bit_rate_switch(true)
        .with_error_state_indicator(true);
    let raw = encode(frame);

    let mut assembler = FrameAssembler::new();
    let results = collect(&mut assembler, raw.as_slice());
    match results.as_slice() {
        [ProcessResult::Frame(Decoded::Frame(CanFrame::Fd(decoded)))] => {
            assert_eq!(decoded.payload(), data.as_slice());
            assert!(decoded.bit_rate_switch);
            assert!(decoded.error_state_indicator);
            assert_eq!(decoded.channel, 1);
            assert!(decoded.id.is_extended());
        }
        other => panic!("unexpected results {:?}", other),
    }
}

#[test]
fn back_to_back_stream() {
    let first = ClassicFrame::new(CanId::standard(0x1F).unwrap(), &[ESCAPE]).unwrap();
    let second = FdFrame::new(CanId::standard(0x2EF).unwrap(), &[END; 12])
        .unwrap()
        .on_channel(2);
    let remote = ClassicFrame::new_remote(CanId::extended(0x1FFF_FFFF).unwrap(), 8).unwrap();

    let mut stream = Vec::new();
    stream.extend_from_slice(encode(first).as_slice());
    stream.extend_from_slice(&[START, 0x04, 0x90, END]);
    stream.extend_from_slice(encode(second).as_slice());
    stream.extend_from_slice(encode(remote).as_slice());

    let mut assembler = FrameAssembler::new();
    let results = collect(&mut assembler, &stream);
    assert_eq!(
        results,
        vec![
            ProcessResult::Frame(Decoded::Frame(first.into())),
            ProcessResult::Frame(Decoded::Control(ControlTag::FirmwareVersion)),
            ProcessResult::Frame(Decoded::Frame(second.into())),
            ProcessResult::Frame(Decoded::Frame(remote.into())),
        ]
    );

    let stats = assembler.stats();
    assert_eq!(stats.rx_frames, 3);
    assert_eq!(stats.rx_control, 1);
    assert_eq!(stats.rx_bytes, 1 + 12 + 8);
}
