//! Plays the UCT engine against a human on a 6x7 board with a forbidden cell
//!
//! Run with `cargo run --release --example play`. Pass `--auto` to let
//! a random opponent play instead of reading moves from stdin.

use std::io::{self, Write};
use std::time::Duration;

use gravity_uct::{Board, ConnectFour, Position, SearchConfig, Side, UctEngine, WinOracle};
use rand::Rng;

const ROWS: usize = 6;
const COLS: usize = 7;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let auto = std::env::args().any(|arg| arg == "--auto");
    let mut rng = rand::thread_rng();

    let forbidden = Position::new(rng.gen_range(0..ROWS), rng.gen_range(0..COLS));
    let mut board = Board::new(ROWS, COLS, Some(forbidden))?;
    let oracle = ConnectFour::new();

    let config = SearchConfig::default().with_max_time(Duration::from_millis(1000));
    let mut engine = UctEngine::new(config);

    println!("UCT Connect Four");
    println!("================");
    println!("You are X, the engine is O, # is the forbidden cell.");
    println!();

    let mut side = Side::Opponent;
    let mut last_move = None;

    loop {
        println!("{}", board);

        let pos = match side {
            Side::Opponent if auto => {
                let open = board.open_columns();
                board.drop_piece(open[rng.gen_range(0..open.len())], side)
            }
            Side::Opponent => {
                print!("Your move (column 0-{}): ", COLS - 1);
                io::stdout().flush()?;

                let mut input = String::new();
                if io::stdin().read_line(&mut input)? == 0 {
                    return Ok(());
                }
                match input.trim().parse::<usize>() {
                    Ok(col) if col < COLS && board.is_column_open(col) => {
                        board.drop_piece(col, side)
                    }
                    _ => {
                        println!("Pick an open column between 0 and {}.", COLS - 1);
                        continue;
                    }
                }
            }
            Side::Machine => {
                let chosen = engine.search(&board, last_move)?;
                println!("Engine plays column {}", chosen.col);
                println!("{}", engine.get_statistics().summary());
                board.drop_piece(chosen.col, side)
            }
        };

        if oracle.wins(side, pos, &board) {
            println!("{}", board);
            match side {
                Side::Machine => println!("The engine wins."),
                Side::Opponent => println!("You win!"),
            }
            return Ok(());
        }
        if oracle.is_tie(&board) {
            println!("{}", board);
            println!("It's a tie.");
            return Ok(());
        }

        last_move = Some(pos);
        side = side.opponent();
    }
}
