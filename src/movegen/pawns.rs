use crate::moves::{Move, MoveFlags, MoveList};
use crate::piece::{Color, Piece, PieceKind, PROMOTION_PIECES};
use crate::position::Position;
use crate::square::Square;

pub(super) fn generate(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let piece = Piece::new(color, PieceKind::Pawn);
    let dir: isize = if color == Color::White { 1 } else { -1 };
    let start_rank = if color == Color::White { 1 } else { 6 };
    let promotion_rank = if color == Color::White { 7 } else { 0 };

    let rank = from.rank() as isize;
    let file = from.file() as isize;
    let forward_rank = rank + dir;

    if (0..8).contains(&forward_rank) {
        let forward_sq = Square::new(forward_rank as usize, file as usize);
        if pos.piece_at(forward_sq).is_none() {
            push_quiet_or_promotion(list, piece, from, forward_sq, promotion_rank);

            if rank as usize == start_rank {
                let double_rank = rank + 2 * dir;
                let double_sq = Square::new(double_rank as usize, file as usize);
                if pos.piece_at(double_sq).is_none() {
                    list.push(Move {
                        from,
                        to: double_sq,
                        piece,
                        captured: None,
                        flags: MoveFlags::PAWN_DOUBLE_PUSH,
                        promotion: None,
                    });
                }
            }
        }
    }

    if !(0..8).contains(&forward_rank) {
        return;
    }

    for df in [-1isize, 1isize] {
        let capture_file = file + df;
        if !(0..8).contains(&capture_file) {
            continue;
        }
        let target = Square::new(forward_rank as usize, capture_file as usize);
        if let Some(target_piece) = pos.piece_at(target) {
            if target_piece.color != color {
                push_capture_or_promotion(list, piece, from, target, target_piece.kind, promotion_rank);
            }
        } else if Some(target) == pos.en_passant_target() {
            list.push(Move {
                from,
                to: target,
                piece,
                captured: Some(PieceKind::Pawn),
                flags: MoveFlags::EN_PASSANT | MoveFlags::CAPTURE,
                promotion: None,
            });
        }
    }
}

fn push_quiet_or_promotion(list: &mut MoveList, piece: Piece, from: Square, to: Square, promotion_rank: usize) {
    if to.rank() == promotion_rank {
        for promo in PROMOTION_PIECES {
            list.push(Move {
                from,
                to,
                piece,
                captured: None,
                flags: MoveFlags::PROMOTION,
                promotion: Some(promo),
            });
        }
    } else {
        list.push(Move {
            from,
            to,
            piece,
            captured: None,
            flags: MoveFlags::NONE,
            promotion: None,
        });
    }
}

fn push_capture_or_promotion(
    list: &mut MoveList,
    piece: Piece,
    from: Square,
    to: Square,
    captured: PieceKind,
    promotion_rank: usize,
) {
    if to.rank() == promotion_rank {
        for promo in PROMOTION_PIECES {
            list.push(Move {
                from,
                to,
                piece,
                captured: Some(captured),
                flags: MoveFlags::CAPTURE | MoveFlags::PROMOTION,
                promotion: Some(promo),
            });
        }
    } else {
        list.push(Move {
            from,
            to,
            piece,
            captured: Some(captured),
            flags: MoveFlags::CAPTURE,
            promotion: None,
        });
    }
}
