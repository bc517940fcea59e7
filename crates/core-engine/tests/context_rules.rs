mod common;

use common::{PRIMARY, SECONDARY, SharedPort, buf, engine_with};
use core_engine::{BufferEvent, InputSourceId, OverrideRegion, SwitchCommand};
use core_script::ScriptClass;

#[test]
fn secondary_word_then_blank_defaults_to_primary_and_protects_gap() {
    // "hello 你好 |" typed up to a trailing blank: the finished CJK word
    // spaces off into Latin typing.
    let text = buf("hello 你好 ");
    let port = SharedPort::with_current(SECONDARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::Edited { cursor: 9 });

    assert_eq!(out.verdict, Some(ScriptClass::Primary));
    assert_eq!(
        out.command,
        SwitchCommand::Activate(InputSourceId::new(PRIMARY))
    );
    assert_eq!(port.current(), Some(InputSourceId::new(PRIMARY)));
    // The skipped blank run is protected.
    assert_eq!(
        engine.regions().active(),
        Some(OverrideRegion { start: 8, end: 9 })
    );
}

#[test]
fn cursor_directly_after_secondary_text_resumes_secondary() {
    // "hello 你好|" with no trailing blank: the cross-line fallback sees the
    // ideograph right behind the cursor.
    let text = buf("hello 你好");
    let port = SharedPort::with_current(PRIMARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::Edited { cursor: 8 });

    assert_eq!(out.verdict, Some(ScriptClass::Secondary));
    assert_eq!(port.current(), Some(InputSourceId::new(SECONDARY)));
    assert!(engine.regions().active().is_none());
}

#[test]
fn blank_between_secondary_word_and_cursor_wins_over_forward_text() {
    // "你好 |hello": the backward blank skip lands after the CJK word, so
    // primary wins and the gap is protected.
    let text = buf("你好 hello");
    let port = SharedPort::with_current(SECONDARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::CursorMoved { cursor: 3 });

    assert_eq!(out.verdict, Some(ScriptClass::Primary));
    assert_eq!(
        engine.regions().active(),
        Some(OverrideRegion { start: 2, end: 3 })
    );
}

#[test]
fn blank_gap_ahead_of_secondary_text_prefers_primary() {
    // "| 你好": blanks ahead, then CJK. Typing here stays primary.
    let text = buf(" 你好");
    let port = SharedPort::with_current(SECONDARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::CursorMoved { cursor: 0 });

    assert_eq!(out.verdict, Some(ScriptClass::Primary));
    assert_eq!(port.current(), Some(InputSourceId::new(PRIMARY)));
    // No blank was skipped backward, so no region exists.
    assert!(engine.regions().active().is_none());
}

#[test]
fn secondary_text_directly_at_cursor_switches_secondary() {
    // "|你好": the ideograph sits at the cursor itself.
    let text = buf("你好");
    let port = SharedPort::with_current(PRIMARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::CursorMoved { cursor: 0 });

    assert_eq!(out.verdict, Some(ScriptClass::Secondary));
    assert_eq!(port.current(), Some(InputSourceId::new(SECONDARY)));
}

#[test]
fn cross_line_primary_fallback() {
    // Empty second line under Latin text.
    let text = buf("hello\n");
    let port = SharedPort::with_current(SECONDARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::Edited { cursor: 6 });

    assert_eq!(out.verdict, Some(ScriptClass::Primary));
    assert_eq!(port.current(), Some(InputSourceId::new(PRIMARY)));
}

#[test]
fn cross_line_secondary_fallback() {
    // Empty second line under CJK text.
    let text = buf("你好\n");
    let port = SharedPort::with_current(PRIMARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::Edited { cursor: 3 });

    assert_eq!(out.verdict, Some(ScriptClass::Secondary));
    assert_eq!(port.current(), Some(InputSourceId::new(SECONDARY)));
}

#[test]
fn undecidable_neighborhood_yields_no_verdict() {
    // Digits and punctuation match neither pattern.
    let text = buf("123 456");
    let port = SharedPort::with_current(PRIMARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::CursorMoved { cursor: 4 });

    assert_eq!(out.verdict, None);
    assert!(out.command.is_noop());
    assert!(port.activations().is_empty());
}

#[test]
fn empty_buffer_yields_no_verdict() {
    let text = buf("");
    let port = SharedPort::with_current(PRIMARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::Edited { cursor: 0 });

    assert_eq!(out.verdict, None);
    assert!(out.command.is_noop());
}

#[test]
fn backward_blank_rule_has_precedence_over_forward_rule() {
    // "你好 | 你好": both the backward rule (blank skipped, secondary word
    // behind) and the forward rule (blank gap, secondary ahead) hold. The
    // backward rule must win, proven by its side effect.
    let text = buf("你好  你好");
    let port = SharedPort::with_current(SECONDARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::CursorMoved { cursor: 3 });

    assert_eq!(out.verdict, Some(ScriptClass::Primary));
    assert_eq!(
        engine.regions().active(),
        Some(OverrideRegion { start: 2, end: 3 })
    );
}

#[test]
fn cursor_past_buffer_end_is_clamped() {
    let text = buf("你好");
    let port = SharedPort::with_current(PRIMARY);
    let mut engine = engine_with(&port);

    let out = engine.handle(&text, BufferEvent::Edited { cursor: 99 });

    // Clamps to the end of "你好" and resumes secondary.
    assert_eq!(out.verdict, Some(ScriptClass::Secondary));
}
