//! End-to-end board lifecycle over shared in-memory storage.
//!
//! Each test boots a board, drives gestures, then boots a second board on the
//! same storage to check what a page reload would see.

use costream_core::event::DragEvent;
use costream_core::geometry::{Point, Rect, Size};
use costream_core::window::{Orientation, WindowMetrics};
use costream_layout::{LayoutSnapshot, PanelId, ResizeEffect, orientation_preset};
use costream_runtime::{Board, BoardConfig, DefaultLayoutKind, LoadSource, MemoryStorage};
use pretty_assertions::assert_eq;

fn seeded_config() -> BoardConfig {
    BoardConfig {
        default_layout: DefaultLayoutKind::Seed,
        window: WindowMetrics::new(1000, 800, Orientation::Landscape),
        ..BoardConfig::default()
    }
}

fn rects(board: &Board) -> Vec<Rect> {
    board.panels().map(|panel| panel.rect()).collect()
}

#[test]
fn committed_layout_survives_reload() {
    let storage = MemoryStorage::new();
    let mut board = Board::boot(seeded_config(), Box::new(storage.clone())).unwrap();
    let two = PanelId::from("2");

    board.drag(&two, DragEvent::start()).unwrap();
    board.drag(&two, DragEvent::moved(25, -10)).unwrap();
    board.drag(&two, DragEvent::end(50, -20)).unwrap();

    let session = board
        .resize_pointer_down(&"3".into(), 1, Point::new(100, 100))
        .unwrap()
        .session
        .unwrap();
    board.resize_pointer_move(session, 1, Point::new(130, 150));
    let up = board.resize_pointer_up(session, 1, Point::new(150, 180));
    assert_eq!(up.effect, ResizeEffect::Committed { size: Size::new(250, 280) });

    let expected = vec![
        Rect::new(0, 0, 200, 200),
        Rect::new(50, 0, 200, 200),
        Rect::new(0, 0, 250, 280),
    ];
    assert_eq!(rects(&board), expected);

    let reloaded = Board::boot(seeded_config(), Box::new(storage)).unwrap();
    assert_eq!(reloaded.load_source(), LoadSource::Stored);
    assert_eq!(rects(&reloaded), expected);
}

#[test]
fn cancelled_drag_is_not_persisted() {
    let storage = MemoryStorage::new();
    let mut board = Board::boot(seeded_config(), Box::new(storage.clone())).unwrap();
    let one = PanelId::from("1");

    board.drag(&one, DragEvent::start()).unwrap();
    board.drag(&one, DragEvent::moved(300, 300)).unwrap();
    board.drag(&one, DragEvent::cancel()).unwrap();

    assert_eq!(board.commits(), 0);
    assert_eq!(storage.raw("costream-layout"), None);
}

#[test]
fn no_stored_layout_boots_deterministic_preset() {
    let window = WindowMetrics::new(1000, 800, Orientation::Landscape);
    let config = BoardConfig {
        window,
        ..BoardConfig::default()
    };
    let first = Board::boot(config.clone(), Box::new(MemoryStorage::new())).unwrap();
    let second = Board::boot(config, Box::new(MemoryStorage::new())).unwrap();

    let preset = orientation_preset(Orientation::Landscape, window.container());
    assert_eq!(rects(&first), preset);
    assert_eq!(rects(&first), rects(&second));
}

#[test]
fn corrupt_storage_boots_default_and_next_commit_repairs_it() {
    let storage = MemoryStorage::new();
    storage.insert_raw("costream-layout", "{ definitely not a layout");
    let mut board = Board::boot(seeded_config(), Box::new(storage.clone())).unwrap();
    assert_eq!(board.load_source(), LoadSource::Malformed);
    assert_eq!(board.store().len(), 3);

    board.add_panel().unwrap();
    let repaired = LayoutSnapshot::from_json(&storage.raw("costream-layout").unwrap()).unwrap();
    assert_eq!(repaired.len(), 4);
}

#[test]
fn save_failure_keeps_memory_authoritative() {
    let storage = MemoryStorage::with_quota(16);
    let mut board = Board::boot(seeded_config(), Box::new(storage.clone())).unwrap();
    let one = PanelId::from("1");

    board.drag(&one, DragEvent::start()).unwrap();
    board.drag(&one, DragEvent::end(40, 40)).unwrap();

    assert_eq!(board.store().get(&one).unwrap().position, Point::new(40, 40));
    assert_eq!(board.persistence_stats().save_failures, 1);
    assert_eq!(storage.raw("costream-layout"), None);
}

#[test]
fn added_panels_get_fresh_ids_after_reload() {
    let storage = MemoryStorage::new();
    let mut board = Board::boot(seeded_config(), Box::new(storage.clone())).unwrap();
    assert_eq!(board.add_panel().unwrap().as_str(), "4");

    let mut reloaded = Board::boot(seeded_config(), Box::new(storage)).unwrap();
    assert_eq!(reloaded.add_panel().unwrap().as_str(), "5");
}
