use crate::attacks;
use crate::bitboard::Bitboard;
use crate::moves::{Move, MoveFlags, MoveList};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

/// Push one move per target bit in `targets`, marking captures against `pos`.
fn push_targets(pos: &Position, from: Square, piece: Piece, targets: Bitboard, list: &mut MoveList) {
    for to in targets.iter() {
        let captured = pos.piece_at(to);
        let flags = if captured.is_some() {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::NONE
        };
        list.push(Move {
            from,
            to,
            piece,
            captured: captured.map(|p| p.kind),
            flags,
            promotion: None,
        });
    }
}

pub(super) fn generate_knight(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let piece = Piece::new(color, PieceKind::Knight);
    let targets = Bitboard(attacks::knight_attacks(from).0 & !pos.occupied_by(color).0);
    push_targets(pos, from, piece, targets, list);
}

pub(super) fn generate_king_steps(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let piece = Piece::new(color, PieceKind::King);
    let targets = Bitboard(attacks::king_attacks(from).0 & !pos.occupied_by(color).0);
    push_targets(pos, from, piece, targets, list);
}

pub(super) fn generate_bishop(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let piece = Piece::new(color, PieceKind::Bishop);
    let targets = Bitboard(attacks::bishop_attacks(from, pos.all_occupied()).0 & !pos.occupied_by(color).0);
    push_targets(pos, from, piece, targets, list);
}

pub(super) fn generate_rook(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let piece = Piece::new(color, PieceKind::Rook);
    let targets = Bitboard(attacks::rook_attacks(from, pos.all_occupied()).0 & !pos.occupied_by(color).0);
    push_targets(pos, from, piece, targets, list);
}

pub(super) fn generate_queen(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let piece = Piece::new(color, PieceKind::Queen);
    let targets = Bitboard(attacks::queen_attacks(from, pos.all_occupied()).0 & !pos.occupied_by(color).0);
    push_targets(pos, from, piece, targets, list);
}
