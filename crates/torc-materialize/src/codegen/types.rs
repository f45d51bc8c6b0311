//! Torc Type to LLVM type mapping.

use inkwell::context::Context;
use inkwell::types::{BasicType, BasicTypeEnum};
use torc_core::types::{FloatPrecision, Type};

/// Convert a Torc `Type` to an LLVM `BasicTypeEnum`.
///
/// Returns `None` for types that cannot be represented in LLVM during Pass 2
/// (e.g., Vec, Distribution, Named, Parameterized).
///
/// Wrapper types (Refined, Linear, Timed, Sized, etc.) are peeled to their
/// base type — refinements are enforced by verification, not by codegen.
pub fn to_llvm_type<'ctx>(ty: &Type, context: &'ctx Context) -> Option<BasicTypeEnum<'ctx>> {
    match ty {
        Type::Void | Type::Unit => {
            // Represent void/unit as an empty struct (LLVM void can't be used as a value)
            Some(context.struct_type(&[], false).into())
        }

        Type::Bool => Some(context.bool_type().into()),

        Type::Int { width, .. } => Some(context.custom_width_int_type(*width as u32).into()),

        Type::Float { precision } => match precision {
            FloatPrecision::F16 => Some(context.f16_type().into()),
            FloatPrecision::F32 => Some(context.f32_type().into()),
            FloatPrecision::F64 => Some(context.f64_type().into()),
            FloatPrecision::F128 => Some(context.f128_type().into()),
        },

        Type::Fixed { total_bits, .. } => {
            // Fixed-point: integer representation with implicit fractional scaling
            Some(context.custom_width_int_type(*total_bits as u32).into())
        }

        Type::Tuple(fields) => {
            let field_types: Vec<BasicTypeEnum<'ctx>> = fields
                .iter()
                .map(|f| to_llvm_type(f, context))
                .collect::<Option<Vec<_>>>()?;
            Some(context.struct_type(&field_types, false).into())
        }

        Type::Record(fields) => {
            // Sorted field order (BTreeMap iteration order)
            let field_types: Vec<BasicTypeEnum<'ctx>> = fields
                .values()
                .map(|f| to_llvm_type(f, context))
                .collect::<Option<Vec<_>>>()?;
            Some(context.struct_type(&field_types, false).into())
        }

        Type::Array { element, length } => {
            let elem_ty = to_llvm_type(element, context)?;
            Some(elem_ty.array_type(*length as u32).into())
        }

        Type::Option(inner) => {
            // Tagged option: { i1, inner }
            let inner_ty = to_llvm_type(inner, context)?;
            let fields = [context.bool_type().into(), inner_ty];
            Some(context.struct_type(&fields, false).into())
        }

        Type::Variant(cases) => {
            // C-like tagged union: { tag, max_payload_sized_field }
            // Tag: i8 for <=256 variants, i32 otherwise
            let tag_ty: BasicTypeEnum<'ctx> = if cases.len() <= 256 {
                context.i8_type().into()
            } else {
                context.i32_type().into()
            };

            // Find largest case payload
            let mut max_size = 0u32;
            let mut max_payload_ty: Option<BasicTypeEnum<'ctx>> = None;
            for case_ty in cases.values() {
                if let Some(llvm_ty) = to_llvm_type(case_ty, context) {
                    // Approximate size by using the type itself
                    // For proper sizing we'd need the target data layout,
                    // but for the union we just pick the "widest" case
                    let size = approx_type_bits(&llvm_ty);
                    if size > max_size {
                        max_size = size;
                        max_payload_ty = Some(llvm_ty);
                    }
                } else {
                    return None;
                }
            }

            match max_payload_ty {
                Some(payload_ty) => {
                    let fields = [tag_ty, payload_ty];
                    Some(context.struct_type(&fields, false).into())
                }
                None => {
                    // All cases are unit/void — tag only
                    let fields = [tag_ty];
                    Some(context.struct_type(&fields, false).into())
                }
            }
        }

        // Wrapper types: peel to base
        Type::Refined { base, .. } => to_llvm_type(base, context),
        Type::Linear { inner, .. }
        | Type::Timed { inner, .. }
        | Type::Sized { inner, .. }
        | Type::Powered { inner, .. }
        | Type::Bandwidth { inner, .. }
        | Type::Posterior { inner, .. }
        | Type::Interval { inner, .. }
        | Type::Approximate { inner, .. } => to_llvm_type(inner, context),

        // Unsupported in Pass 2
        Type::Vec { .. } | Type::Distribution(_) | Type::Named(_) | Type::Parameterized { .. } => {
            None
        }
    }
}

/// Approximate the bit-size of an LLVM type (for variant payload comparison).
fn approx_type_bits(ty: &BasicTypeEnum<'_>) -> u32 {
    match ty {
        BasicTypeEnum::IntType(t) => t.get_bit_width(),
        BasicTypeEnum::FloatType(_) => 64, // conservative
        BasicTypeEnum::StructType(t) => t.count_fields() * 64, // rough
        BasicTypeEnum::ArrayType(t) => t.len() * 64,
        BasicTypeEnum::PointerType(_) => 64,
        BasicTypeEnum::VectorType(t) => t.get_size() * 64,
        #[allow(unreachable_patterns)]
        _ => 64,
    }
}
