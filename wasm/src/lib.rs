use minesweeper_ai as ms;
use wasm_bindgen::prelude::*;

// The agent travels between calls as bcs bytes. Board sizes and counts are `u8`,
// coordinates are `usize` both ways. Moves come back as `[row, col]`, or an empty
// array when the agent has nothing to offer.

fn cell_to_vec(cell: Option<ms::Cell>) -> Vec<usize> {
    cell.map(|c| vec![c.row, c.col])
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn create_agent(height: u8, width: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::Agent::new(height as usize, width as usize);
    agent.to_bytes().map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn add_knowledge(bts: Vec<u8>, row: usize, col: usize, count: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut agent = ms::Agent::from_bytes(&bts).map_err(|e| e.to_string())?;
    agent
        .add_knowledge(ms::Cell { row, col }, count as usize)
        .map_err(|e| e.to_string())?;
    agent.to_bytes().map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn safe_move(bts: Vec<u8>) -> Result<Vec<usize>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::Agent::from_bytes(&bts).map_err(|e| e.to_string())?;
    Ok(cell_to_vec(agent.make_safe_move()))
}

#[wasm_bindgen]
pub fn random_move(bts: Vec<u8>) -> Result<Vec<usize>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::Agent::from_bytes(&bts).map_err(|e| e.to_string())?;
    let mut rng = rand::rng();
    Ok(cell_to_vec(agent.make_random_move(&mut rng)))
}

#[wasm_bindgen]
pub fn known_mines(bts: Vec<u8>) -> Result<Vec<usize>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::Agent::from_bytes(&bts).map_err(|e| e.to_string())?;
    let mut mines: Vec<ms::Cell> = agent.mines().iter().copied().collect();
    mines.sort();
    Ok(mines
        .into_iter()
        .flat_map(|c| [c.row, c.col])
        .collect())
}
