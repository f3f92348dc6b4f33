mod helpers {
    include!("../../helpers/mod.rs");
}

use helpers::MockSerialLink;
use triplecan::core::{Command, END, START};
use triplecan::error::{CodecError, SendFrameError};
use triplecan::protocol::config::LinkConfig;
use triplecan::protocol::transport::can_frame::{ClassicFrame, ControlTag, Decoded};
use triplecan::protocol::transport::can_id::CanId;
use triplecan::protocol::transport::framing::assembler::{FrameAssembler, ProcessResult};
use triplecan::protocol::transport::framing::commands::{
    encode_command, CanSpeed, ControlCommand, FD_PORT,
};
use triplecan::protocol::transport::framing::decoder::control_payload;
use triplecan::protocol::transport::framing::encoder::FrameEncoder;
use triplecan::protocol::transport::traits::frame_sender::FrameSender;

#[tokio::test]
async fn send_command_writes_one_frame() {
    let (mut dut, mut host) = MockSerialLink::create_pair();

    dut.send_command(&ControlCommand::FirmwareVersionRequest)
        .await
        .expect("write must succeed");
    dut.send_command(&ControlCommand::CanSettings {
        port: 0,
        speed: CanSpeed::Kbps250,
        listen_only: true,
    })
    .await
    .expect("write must succeed");

    assert_eq!(
        host.next_chunk().await.unwrap(),
        vec![START, 0x04, 0x90, END]
    );
    assert_eq!(
        host.next_chunk().await.unwrap(),
        vec![START, 0x08, 0x88, 0x00, 0x00, 0xFA, 0x01, END]
    );
}

#[tokio::test]
async fn send_frame_reports_codec_errors_before_writing() {
    let (mut dut, _host) = MockSerialLink::create_pair();
    let encoder = FrameEncoder::new(LinkConfig::new().with_channel_count(2));
    let frame = ClassicFrame::new(CanId::standard(0x10).unwrap(), &[1])
        .unwrap()
        .on_channel(2);

    let result = dut.send_frame(&encoder, &frame.into()).await;
    assert!(matches!(
        result,
        Err(SendFrameError::Codec(CodecError::ChannelOutOfRange {
            channel: 2,
            channel_count: 2
        }))
    ));
}

#[tokio::test]
async fn send_frame_fails_when_peer_is_gone() {
    let (mut dut, host) = MockSerialLink::create_pair();
    drop(host);
    let frame = ClassicFrame::new(CanId::standard(0x10).unwrap(), &[1]).unwrap();

    let result = dut.send_frame(&FrameEncoder::default(), &frame.into()).await;
    assert!(matches!(result, Err(SendFrameError::Send(()))));
}

#[test]
fn status_reply_is_tagged_and_body_exposed() {
    let reply = encode_command(Command::Status, &[0x01, END, 0x7F]).unwrap();
    let mut assembler = FrameAssembler::new();
    let mut results = Vec::new();
    for &byte in reply.as_slice() {
        match assembler.process_byte(byte) {
            ProcessResult::Pending => {}
            other => results.push(other),
        }
    }
    assert_eq!(
        results,
        vec![ProcessResult::Frame(Decoded::Control(ControlTag::Status))]
    );
    assert_eq!(
        control_payload(reply.unstuffed().as_slice()),
        &[0x01, END, 0x7F]
    );
}

#[test]
fn fd_settings_and_timestamp_layouts() {
    let fd = ControlCommand::FdSettings {
        port: FD_PORT,
        speed_code: 1_252_000,
        listen_only: true,
        iso_crc: false,
        esi: true,
    }
    .encode()
    .unwrap();
    assert_eq!(
        control_payload(fd.unstuffed().as_slice()),
        &[FD_PORT, 0x00, 0x13, 0x1A, 0xA0, 0x01, 0x00, 0x01]
    );

    let ts = ControlCommand::TimestampMode(false).encode().unwrap();
    assert_eq!(ts.as_slice(), &[START, 0x05, 0x8B, 0x00, END]);
}
