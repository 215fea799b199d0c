use auxstar::rate::{Approach, Axis, Direction, GuideRate};
use auxstar::{Dms, Error, HandController, Link, MockTransport, SessionConfig, SessionState, Target};

fn controller(replies: &[&[u8]]) -> HandController<MockTransport> {
    let mut transport = MockTransport::new();
    for reply in replies {
        transport.queue(reply);
    }
    HandController::new(transport)
}

fn written(c: &HandController<MockTransport>) -> &[u8] {
    c.session().transport().written()
}

#[test]
fn get_version_end_to_end() {
    let mut c = controller(&[&[0x06, 0x0d, b'#']]);
    let version = c.get_version(Target::Alt).unwrap();
    assert_eq!(written(&c), &[0x50, 0x01, 0x11, 0xfe, 0x00, 0x00, 0x00, 0x02]);
    assert_eq!(version.hex(), "060d");
    assert_eq!(version.to_string(), "6.13");
}

#[test]
fn get_version_times_out_without_reply() {
    let mut c = controller(&[]);
    assert!(matches!(
        c.get_version(Target::Alt),
        Err(Error::Timeout { expected: 3, .. })
    ));
    assert_eq!(c.state(), SessionState::Timeout);
    c.reset().unwrap();
    assert_eq!(c.state(), SessionState::Idle);
}

#[test]
fn slew_rate_out_of_range_writes_nothing() {
    let mut c = controller(&[]);
    assert!(matches!(
        c.slew_fixed(Target::Alt, 15),
        Err(Error::ArgumentRange { .. })
    ));
    assert!(matches!(
        c.slew_fixed(Target::Alt, -10),
        Err(Error::ArgumentRange { .. })
    ));
    assert!(written(&c).is_empty());
    assert_eq!(c.state(), SessionState::Idle);
}

#[test]
fn slew_fixed_picks_direction_by_sign() {
    let mut c = controller(&[b"#", b"#", b"#"]);
    c.slew_fixed(Target::Azm, -9).unwrap();
    c.slew_fixed(Target::Alt, 3).unwrap();
    c.stop(Target::Alt).unwrap();
    assert_eq!(
        written(&c),
        &[
            0x50, 0x02, 0x10, 0x25, 0x09, 0x00, 0x00, 0x00, //
            0x50, 0x02, 0x11, 0x24, 0x03, 0x00, 0x00, 0x00, //
            0x50, 0x02, 0x11, 0x24, 0x00, 0x00, 0x00, 0x00,
        ]
    );
}

#[test]
fn position_round_trip_and_cache() {
    let mut c = controller(&[&[0x40, 0x00, 0x00, b'#'], &[0xc0, 0x00, 0x00, b'#']]);
    assert_eq!(c.get_position(Target::Alt).unwrap(), 0.25);
    assert_eq!(c.get_position(Target::Azm).unwrap(), 0.75);
    assert_eq!(c.last_position(Axis::Altitude), Some(0.25));
    assert_eq!(c.last_position(Axis::Azimuth), Some(0.75));
}

#[test]
fn goto_and_set_position_encode_angles() {
    let mut c = controller(&[b"#", b"#", b"#"]);
    c.goto_fast(Target::Azm, Dms::new(false, 90, 0, 0.0).unwrap()).unwrap();
    c.set_position(Target::Alt, Dms::new(false, 180, 0, 0.0).unwrap()).unwrap();
    c.goto_slow(Target::Alt, Dms::new(true, 90, 0, 0.0).unwrap()).unwrap();
    assert_eq!(
        written(&c),
        &[
            0x50, 0x04, 0x10, 0x02, 0x40, 0x00, 0x00, 0x00, //
            0x50, 0x04, 0x11, 0x04, 0x80, 0x00, 0x00, 0x00, //
            0x50, 0x04, 0x11, 0x17, 0xc0, 0x00, 0x00, 0x00,
        ]
    );
}

#[test]
fn guide_rate_sentinels_and_direction() {
    let mut c = controller(&[b"#", b"#", b"#"]);
    c.set_guide_rate(Target::Azm, Direction::Positive, GuideRate::Sidereal)
        .unwrap();
    c.set_guide_rate(Target::Azm, Direction::Negative, GuideRate::Lunar)
        .unwrap();
    c.set_guide_rate(Target::Alt, Direction::Positive, GuideRate::Rate(0.0))
        .unwrap();
    assert_eq!(
        written(&c),
        &[
            0x50, 0x04, 0x10, 0x06, 0xff, 0xff, 0x00, 0x00, //
            0x50, 0x04, 0x10, 0x07, 0xff, 0xfd, 0x00, 0x00, //
            0x50, 0x04, 0x11, 0x06, 0x00, 0x00, 0x00, 0x00,
        ]
    );
}

#[test]
fn ambiguous_guide_rate_is_rejected() {
    assert!(matches!(
        GuideRate::from_flags(0.01, true, false, false),
        Err(Error::ArgumentRange { .. })
    ));
    let mut c = controller(&[]);
    assert!(c
        .set_guide_rate(Target::Alt, Direction::Positive, GuideRate::Rate(2.0))
        .is_err());
    assert!(written(&c).is_empty());
}

#[test]
fn backlash_and_approach() {
    let mut c = controller(&[b"#", b"#", &[0x05, b'#'], &[0x01, b'#'], &[0x00, b'#']]);
    c.set_backlash(Target::Alt, 20).unwrap();
    c.set_backlash(Target::Alt, -5).unwrap();
    assert_eq!(c.get_backlash(Target::Alt, Direction::Negative).unwrap(), 5);
    assert_eq!(c.get_approach(Target::Azm).unwrap(), Approach::Negative);
    c.set_approach(Target::Azm, Approach::Positive).unwrap();
    assert_eq!(
        &written(&c)[..16],
        &[
            0x50, 0x02, 0x11, 0x10, 0x14, 0x00, 0x00, 0x00, //
            0x50, 0x02, 0x11, 0x11, 0x05, 0x00, 0x00, 0x00,
        ]
    );
    assert_eq!(&written(&c)[32..], &[0x50, 0x02, 0x10, 0xfd, 0x00, 0x00, 0x00, 0x01]);
    assert!(matches!(
        c.set_backlash(Target::Alt, 100),
        Err(Error::ArgumentRange { .. })
    ));
}

#[test]
fn cordwrap() {
    let mut c = controller(&[b"#", &[0xff, b'#'], b"#", &[0x00, b'#'], &[0x80, 0x00, 0x00, b'#']]);
    c.enable_cordwrap(Target::Azm).unwrap();
    assert!(c.poll_cordwrap(Target::Azm).unwrap());
    c.disable_cordwrap(Target::Azm).unwrap();
    assert!(!c.poll_cordwrap(Target::Azm).unwrap());
    assert_eq!(c.get_cordwrap_position(Target::Azm).unwrap(), 0.5);
}

#[test]
fn status_report() {
    let mut c = controller(&[
        &[0x07, 0x0b, b'#'],
        &[0x07, 0x0b, b'#'],
        &[0x05, 0x23, b'#'],
        &[0x20, 0x00, 0x00, b'#'],
        &[0x40, 0x00, 0x00, b'#'],
    ]);
    let status = c.status().unwrap();
    assert_eq!(status.hc_version.hex(), "0523");
    assert_eq!(status.altitude, 0.125);
    let report = status.to_string();
    assert!(report.contains("ALT ..................................... : 045°00'00.0\""));
    assert!(report.contains("AZM ..................................... : 090°00'00.0\""));
}

#[test]
fn direct_bus_link() {
    let config = SessionConfig {
        link: Link::Direct,
        origin: Target::HandControllerPlus,
        expect_echo: false,
    };
    let mut transport = MockTransport::new();
    transport.queue(&[0x3b, 0x04, 0x11, 0x0d, 0xfc, 0x01, 0xe1]);
    let mut c = HandController::with_config(transport, config);
    assert_eq!(c.get_approach(Target::Alt).unwrap(), Approach::Negative);
    assert_eq!(written(&c), &[0x3b, 0x03, 0x0d, 0x11, 0xfc, 0xe3]);
}

#[test]
fn direct_slew_accepts_motor_ack() {
    let config = SessionConfig {
        link: Link::Direct,
        origin: Target::HandControllerPlus,
        expect_echo: false,
    };
    let mut transport = MockTransport::new();
    // the azimuth controller acknowledges moves with one data byte
    transport
        .queue(&[0x3b, 0x04, 0x10, 0x0d, 0x25, 0x01, 0xb9])
        .queue(&[0x3b, 0x04, 0x10, 0x0d, 0x24, 0x01, 0xba]);
    let mut c = HandController::with_config(transport, config);
    c.slew_fixed(Target::Azm, -9).unwrap();
    c.stop(Target::Azm).unwrap();
    assert_eq!(c.state(), SessionState::Idle);
    assert_eq!(
        written(&c),
        &[
            0x3b, 0x04, 0x0d, 0x10, 0x25, 0x09, 0xb1, //
            0x3b, 0x04, 0x0d, 0x10, 0x24, 0x00, 0xbb,
        ]
    );
}

#[test]
fn stray_reply_requires_reset() {
    let config = SessionConfig {
        link: Link::Direct,
        origin: Target::HandControllerPlus,
        expect_echo: false,
    };
    let mut transport = MockTransport::new();
    // approach reply from altitude while azimuth was asked
    transport
        .queue(&[0x3b, 0x04, 0x11, 0x0d, 0xfc, 0x01, 0xe1])
        .queue(&[0x3b, 0x04, 0x10, 0x0d, 0xfc, 0x00, 0xe3]);
    let mut c = HandController::with_config(transport, config);
    assert!(matches!(
        c.get_approach(Target::Azm),
        Err(Error::UnexpectedResponse { .. })
    ));
    assert!(matches!(
        c.get_approach(Target::Azm),
        Err(Error::NotIdle(SessionState::ChecksumFail))
    ));
    c.reset().unwrap();
    assert_eq!(c.session().transport().pending(), 0);
}
