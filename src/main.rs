use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use dungeon_duel::battle::presenter::TerminalView;
use dungeon_duel::battle::rng::RngSource;
use dungeon_duel::battle::save::PersistenceGateway;
use dungeon_duel::battle::BattleSession;
use dungeon_duel::config::TICKS_PER_SEC;
use dungeon_duel::input::{key_event, ClickState, InputEvent};
use dungeon_duel::time::GameTime;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(target_arch = "wasm32")]
type PlatformSlot = dungeon_duel::battle::save::LocalStorageSlot;
#[cfg(not(target_arch = "wasm32"))]
type PlatformSlot = dungeon_duel::battle::save::MemorySlot;

/// Map a page-level pointer position onto the action under it.
fn dom_hit_test(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();
    let hit = cs.hit_test_pixels(click_x, click_y, rect.width(), rect.height());
    tracing::debug!(click_x, click_y, ?hit, targets = cs.targets.len(), "click");
    hit
}

fn main() -> io::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dungeon_duel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    tracing::info!("Starting Dungeon Duel");

    let session = Rc::new(RefCell::new(BattleSession::boot(
        RngSource::from_thread(),
        PersistenceGateway::new(PlatformSlot::new()),
        TerminalView::new(),
    )));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let session = session.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let hit = dom_hit_test(mouse_event.x, mouse_event.y, &cs);
            drop(cs);

            if let Some(action_id) = hit {
                session.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let session = session.clone();
        move |key| {
            if let Some(event) = key_event(&key.code) {
                session.borrow_mut().handle_input(&event);
            }
        }
    });

    let clock = RefCell::new(GameTime::new(TICKS_PER_SEC));
    terminal.draw_web(move |f| {
        let ticks = clock.borrow_mut().update(js_sys::Date::now());
        let mut session = session.borrow_mut();
        if ticks > 0 {
            session.tick(ticks);
        }

        let area = f.area();
        click_state.borrow_mut().begin_frame(area);
        session.render(f, area, &click_state);
    });

    Ok(())
}
