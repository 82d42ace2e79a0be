// Simple command-line application to play chess
//
// Everything here is the engine's "external collaborator": rendering, input
// collection and turn bookkeeping live in this file, while duelchess itself
// only answers rules questions.

use duelchess::{Color, Coord, File, Game, Outcome, Piece, Rank};
use std::io::{self, BufRead, Write};

fn print_board(game: &Game) {
    for i in (0..8).rev() {
        let rank = Rank::from_index(i);
        print!("{}|", rank);
        for file in File::iter() {
            match game.board().get(Coord::from_parts(file, rank)) {
                Some(p) => print!("{}", p.as_char()),
                None => print!("."),
            }
        }
        println!();
    }
    println!("-+--------");
    print!(" |");
    for file in File::iter() {
        print!("{}", file);
    }
    println!();
}

fn read_coords(stdin: &mut impl BufRead) -> Option<(Coord, Coord)> {
    let mut s = String::new();
    stdin.read_line(&mut s).ok()?;
    let mut words = s.split_whitespace();
    let src = words.next()?.parse::<Coord>().ok()?;
    let dst = words.next()?.parse::<Coord>().ok()?;
    Some((src, dst))
}

fn read_promotion(stdin: &mut impl BufRead) -> Piece {
    loop {
        print!("Promote to (Q/R/B/N): ");
        io::stdout().flush().unwrap();
        let mut s = String::new();
        stdin.read_line(&mut s).unwrap();
        match s.trim().chars().next().and_then(Piece::from_char) {
            Some(p) if matches!(p, Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight) => {
                return p
            }
            _ => println!("Bad piece, try again."),
        }
    }
}

fn main() {
    let mut stdin = io::stdin().lock();
    let mut game = Game::new();
    let mut side = Color::White;

    loop {
        if let Some(outcome) = game.outcome(side) {
            print_board(&game);
            match outcome {
                Outcome::Win { side: winner } => println!("Checkmate! {:?} wins.", winner),
                Outcome::Draw => println!("Stalemate."),
            }
            break;
        }

        print_board(&game);
        if game.is_check(side) {
            println!("{:?} is in check.", side);
        }
        print!("{:?} move (e.g. \"e2 e4\"): ", side);
        io::stdout().flush().unwrap();

        let (src, dst) = match read_coords(&mut stdin) {
            Some(pair) => pair,
            None => {
                println!("Bad input, expected two squares.");
                println!();
                continue;
            }
        };

        // Reject moving the opponent's pieces; the engine itself doesn't
        // track whose turn it is.
        if !game.board().is_ally(src, side) {
            println!("No {:?} piece on {}.", side, src);
            println!();
            continue;
        }

        if let Err(e) = game.make_move(src.row(), src.col(), dst.row(), dst.col()) {
            println!("Bad move: {}", e);
            println!();
            continue;
        }

        if duelchess::moves::promotion_square(game.board()).is_some() {
            let target = read_promotion(&mut stdin);
            game.promote(target).unwrap();
        }

        println!();
        side = side.inv();
    }
}
