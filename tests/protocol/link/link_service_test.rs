mod helpers {
    include!("../../helpers/mod.rs");
}

use helpers::MockSerialLink;
use static_cell::StaticCell;
use tokio::time::{timeout, Duration};
use triplecan::core::{END, START};
use triplecan::protocol::config::LinkConfig;
use triplecan::protocol::link::{CommandChannel, FrameChannel, LinkService};
use triplecan::protocol::transport::can_frame::{CanFrame, ClassicFrame, ControlTag, Decoded};
use triplecan::protocol::transport::can_id::CanId;
use triplecan::protocol::transport::framing::commands::ControlCommand;
use triplecan::protocol::transport::framing::encoder::FrameEncoder;
use triplecan::protocol::transport::traits::link_observer::{LinkObserver, NoopObserver};

static FRAME_CHANNEL: StaticCell<FrameChannel<8>> = StaticCell::new();
static COMMAND_CHANNEL: StaticCell<CommandChannel<4>> = StaticCell::new();
static DUPLEX_FRAMES: StaticCell<FrameChannel<8>> = StaticCell::new();
static DUPLEX_COMMANDS: StaticCell<CommandChannel<4>> = StaticCell::new();

#[tokio::test]
async fn runner_forwards_decoded_frames_and_stops_on_close() {
    let frame_channel = FRAME_CHANNEL.init(FrameChannel::<8>::new());
    let (dut, host) = MockSerialLink::create_pair();

    let service = LinkService::<_, NoopObserver, 0, 8>::new(
        dut,
        LinkConfig::default(),
        None,
        Some(&*frame_channel),
    );
    let parts = service.into_parts();
    assert!(parts.handle.is_none());
    let mut frames = parts.frames.expect("frames must exist when frame channel is provided");

    let frame = ClassicFrame::new(CanId::standard(0x321).unwrap(), &[START, END, 0x42])
        .unwrap()
        .on_channel(1);
    let raw = FrameEncoder::default().encode(&frame.into()).unwrap();

    // Split the frame across writes, with a status reply in between.
    let (head, tail) = raw.as_slice().split_at(5);
    host.inject(head);
    host.inject(tail);
    host.inject(&[START, 0x05, 0x8A, 0x00, END]);
    drop(host);

    let result = timeout(Duration::from_secs(1), parts.runner.drive())
        .await
        .expect("runner must stop once the link closes");
    assert!(result.is_ok());

    assert_eq!(
        frames.try_recv(),
        Some(Decoded::Frame(CanFrame::Classic(frame)))
    );
    assert_eq!(frames.try_recv(), Some(Decoded::Control(ControlTag::Status)));
    assert_eq!(frames.try_recv(), None);
}

#[derive(Default)]
struct SentCounter {
    sent: usize,
}

impl LinkObserver for SentCounter {
    fn frame_sent(&mut self, _frame: &triplecan::core::RawFrame) {
        self.sent += 1;
    }
}

#[tokio::test]
async fn handle_queues_frames_and_commands() {
    let frame_channel = DUPLEX_FRAMES.init(FrameChannel::<8>::new());
    let command_channel = DUPLEX_COMMANDS.init(CommandChannel::<4>::new());
    let (dut, mut host) = MockSerialLink::create_pair();

    let service = LinkService::<_, _, 4, 8>::with_observer(
        dut,
        LinkConfig::default(),
        SentCounter::default(),
        Some(&*command_channel),
        Some(&*frame_channel),
    );
    let parts = service.into_parts();
    let handle = parts
        .handle
        .expect("handle must exist when command channel is provided");
    let mut frames = parts.frames.expect("frames must exist");
    let mut runner_future = Box::pin(parts.runner.drive());

    tokio::select! {
        result = &mut runner_future => {
            panic!("runner ended unexpectedly: {:?}", result);
        }
        _ = async {
            handle
                .send_command(&ControlCommand::FirmwareVersionRequest)
                .await
                .expect("queueing must succeed");
            assert_eq!(
                host.next_chunk().await.expect("request expected on the link"),
                vec![START, 0x04, 0x90, END]
            );

            let frame = ClassicFrame::new(CanId::extended(0x0CF0_0400).unwrap(), &[0xFF; 8])
                .unwrap()
                .on_channel(2);
            handle
                .send_frame(&frame.into())
                .await
                .expect("queueing must succeed");
            let written = host.next_chunk().await.expect("frame expected on the link");
            assert_eq!(written, FrameEncoder::default().encode(&frame.into()).unwrap().as_slice());

            let invalid = frame.on_channel(3);
            assert!(handle.send_frame(&invalid.into()).await.is_err());

            // Reply from the device, with a partial frame flushed first.
            host.inject(&[START, 0x20, 0x81, 0x00]);
            handle.reset_receiver().await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            host.inject(&[START, 0x06, 0x90, 0x01, 0x02, END]);
            let reply = timeout(Duration::from_secs(1), frames.recv())
                .await
                .expect("reply must be forwarded");
            assert_eq!(reply, Decoded::Control(ControlTag::FirmwareVersion));
        } => {}
    }
}
