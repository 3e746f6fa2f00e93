use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct BoardCanvas {
    pub(crate) board: pinboard::Board,
    pub(crate) engine: pinboard::CanvasEngine,
}

impl BoardCanvas {
    pub fn rs_new() -> BoardCanvas {
        BoardCanvas {
            board: pinboard::Board::new(),
            engine: pinboard::CanvasEngine::new(),
        }
    }
    pub fn rs_rev(&self) -> u64 {
        self.board.rev()
    }
}
