//! Board reconstruction and move choice.

use cozy_chess::{Board, File, Move, Piece, Rank, Square};

use crate::error::{BotError, BotResult};

/// Build the starting position of a game. The API sends `startpos` for the
/// standard initial position.
pub fn board_from(initial_fen: &str) -> BotResult<Board> {
    if initial_fen.is_empty() || initial_fen == "startpos" {
        return Ok(Board::default());
    }
    initial_fen
        .parse()
        .map_err(|_| BotError::InvalidFen(initial_fen.to_string()))
}

pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_moves(|mvs| {
        moves.extend(mvs);
        false
    });
    moves
}

/// Parse a move sent by the server.
///
/// Castling arrives as the king's two-square step (`e1g1`); the board
/// expects king-takes-rook (`e1h1`).
pub fn parse_uci(board: &Board, uci: &str) -> BotResult<Move> {
    let mv: Move = uci
        .parse()
        .map_err(|_| BotError::InvalidMove(uci.to_string()))?;

    let is_king = board.piece_on(mv.from) == Some(Piece::King);
    let is_back_rank = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    if !is_king || !is_back_rank || mv.from.file() != File::E || mv.promotion.is_some() {
        return Ok(mv);
    }

    let rook_file = match mv.to.file() {
        File::G => File::H,
        File::C => File::A,
        _ => return Ok(mv),
    };
    let castle = Move {
        from: mv.from,
        to: Square::new(rook_file, mv.from.rank()),
        promotion: None,
    };
    if legal_moves(board).contains(&castle) {
        Ok(castle)
    } else {
        Ok(mv)
    }
}

/// Format a move for the server, turning king-takes-rook castling back into
/// the king's two-square step.
pub fn format_uci(board: &Board, mv: Move) -> String {
    let side = board.side_to_move();
    let is_castle =
        board.piece_on(mv.from) == Some(Piece::King) && board.color_on(mv.to) == Some(side);
    if !is_castle {
        return mv.to_string();
    }

    let file = if (mv.to.file() as u8) > (mv.from.file() as u8) {
        File::G
    } else {
        File::C
    };
    Move {
        from: mv.from,
        to: Square::new(file, mv.from.rank()),
        promotion: None,
    }
    .to_string()
}

/// Replay a space-separated move list on top of the initial position.
pub fn replay(initial_fen: &str, moves: &str) -> BotResult<Board> {
    let mut board = board_from(initial_fen)?;
    for uci in moves.split_whitespace() {
        let mv = parse_uci(&board, uci)?;
        board
            .try_play(mv)
            .map_err(|_| BotError::IllegalMove(uci.to_string()))?;
    }
    Ok(board)
}

fn is_capture(board: &Board, mv: Move) -> bool {
    board.color_on(mv.to) == Some(!board.side_to_move())
}

/// The first capture in generation order, else the first legal move.
pub fn choose_move(board: &Board) -> Option<Move> {
    let moves = legal_moves(board);
    moves
        .iter()
        .copied()
        .find(|mv| is_capture(board, *mv))
        .or_else(|| moves.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::{Color, GameStatus};

    #[test]
    fn test_startpos() {
        let board = board_from("startpos").unwrap();
        assert_eq!(board, Board::default());
        assert_eq!(legal_moves(&board).len(), 20);
        assert!(board_from("not a fen").is_err());
    }

    #[test]
    fn test_replay_with_castling() {
        let board = replay("startpos", "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6 e1g1").unwrap();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(
            board.piece_on(Square::new(File::G, Rank::First)),
            Some(Piece::King)
        );
        assert_eq!(
            board.piece_on(Square::new(File::F, Rank::First)),
            Some(Piece::Rook)
        );
    }

    #[test]
    fn test_replay_rejects_illegal_move() {
        assert!(matches!(
            replay("startpos", "e2e5"),
            Err(BotError::IllegalMove(_))
        ));
        assert!(matches!(
            replay("startpos", "zz"),
            Err(BotError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_castling_is_formatted_as_king_step() {
        let board = replay("startpos", "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6").unwrap();
        let castle = parse_uci(&board, "e1g1").unwrap();
        assert_eq!(castle.to, Square::new(File::H, Rank::First));
        assert_eq!(format_uci(&board, castle), "e1g1");
    }

    #[test]
    fn test_choose_move_prefers_capture() {
        let board = replay("startpos", "e2e4 d7d5").unwrap();
        let mv = choose_move(&board).unwrap();
        assert_eq!(format_uci(&board, mv), "e4d5");
    }

    #[test]
    fn test_choose_move_is_deterministic() {
        let board = Board::default();
        assert_eq!(choose_move(&board), choose_move(&board));
    }

    #[test]
    fn test_no_move_when_mated() {
        let board = replay("startpos", "f2f3 e7e5 g2g4 d8h4").unwrap();
        assert_eq!(board.status(), GameStatus::Won);
        assert_eq!(choose_move(&board), None);
    }
}
